//! RetroContext - I/O primitives for board storage
//!
//! The context provides access to storage and utilities. No business logic
//! methods, just data access primitives. Commands do all the work.
//!
//! Storage is one directory per board. Mutating commands serialize through
//! [`RetroContext::lock_board`]: a lazily created in-process mutex per board
//! id plus an advisory file lock for cross-process safety. Reads never lock.

use crate::error::{RetroError, Result};
use crate::types::{Board, BoardId, Card, CardId, Reaction, ReactionId, ReactionType, UserHash, UserSession};
use async_trait::async_trait;
use fs2::FileExt;
use retroboard_operations::{ActivitySink, LogEntry};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// How often and how long to retry a contended file lock before giving up
const LOCK_RETRY_ATTEMPTS: u32 = 10;
const LOCK_RETRY_DELAY: Duration = Duration::from_millis(25);

/// Context passed to every command - provides access, not logic
pub struct RetroContext {
    /// Path to the storage root
    root: PathBuf,
    /// Lazily created per-board writer mutexes, keyed by board id
    board_locks: Mutex<HashMap<BoardId, Arc<tokio::sync::Mutex<()>>>>,
}

impl RetroContext {
    /// Create a new context rooted at the given storage directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            board_locks: Mutex::new(HashMap::new()),
        }
    }

    // =========================================================================
    // Path helpers
    // =========================================================================

    /// Get the storage root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to the boards directory
    pub fn boards_dir(&self) -> PathBuf {
        self.root.join("boards")
    }

    /// Path to one board's directory
    pub fn board_dir(&self, id: &BoardId) -> PathBuf {
        self.boards_dir().join(id.as_str())
    }

    /// Path to a board's metadata file
    pub fn board_path(&self, id: &BoardId) -> PathBuf {
        self.board_dir(id).join("board.json")
    }

    /// Path to a board's cards directory
    pub fn cards_dir(&self, board_id: &BoardId) -> PathBuf {
        self.board_dir(board_id).join("cards")
    }

    /// Path to a card's JSON file
    pub fn card_path(&self, board_id: &BoardId, id: &CardId) -> PathBuf {
        self.cards_dir(board_id).join(format!("{}.json", id))
    }

    /// Path to a board's reactions directory
    pub fn reactions_dir(&self, board_id: &BoardId) -> PathBuf {
        self.board_dir(board_id).join("reactions")
    }

    /// Path to a reaction's JSON file
    pub fn reaction_path(&self, board_id: &BoardId, id: &ReactionId) -> PathBuf {
        self.reactions_dir(board_id).join(format!("{}.json", id))
    }

    /// Path to a board's sessions directory
    pub fn sessions_dir(&self, board_id: &BoardId) -> PathBuf {
        self.board_dir(board_id).join("sessions")
    }

    /// Path to a session's JSON file, keyed by the user hash
    pub fn session_path(&self, board_id: &BoardId, user_hash: &UserHash) -> PathBuf {
        self.sessions_dir(board_id)
            .join(format!("{}.json", user_hash))
    }

    /// Path to a board's activity directory
    pub fn activity_dir(&self, board_id: &BoardId) -> PathBuf {
        self.board_dir(board_id).join("activity")
    }

    /// Path to a board's current activity log
    pub fn activity_path(&self, board_id: &BoardId) -> PathBuf {
        self.activity_dir(board_id).join("current.jsonl")
    }

    /// Path to the global (board-less) activity log
    pub fn global_activity_path(&self) -> PathBuf {
        self.root.join("activity").join("current.jsonl")
    }

    /// Path to a board's lock file
    pub fn lock_path(&self, board_id: &BoardId) -> PathBuf {
        self.board_dir(board_id).join(".lock")
    }

    // =========================================================================
    // Directory initialization
    // =========================================================================

    /// Check if a board exists
    pub fn board_exists(&self, id: &BoardId) -> bool {
        self.board_path(id).exists()
    }

    /// Create the directory structure for a board.
    ///
    /// This is idempotent - safe to call multiple times.
    pub async fn create_board_directories(&self, id: &BoardId) -> Result<()> {
        fs::create_dir_all(self.board_dir(id)).await?;
        fs::create_dir_all(self.cards_dir(id)).await?;
        fs::create_dir_all(self.reactions_dir(id)).await?;
        fs::create_dir_all(self.sessions_dir(id)).await?;
        fs::create_dir_all(self.activity_dir(id)).await?;
        Ok(())
    }

    // =========================================================================
    // Board I/O
    // =========================================================================

    /// Read a board file
    pub async fn read_board(&self, id: &BoardId) -> Result<Board> {
        let path = self.board_path(id);
        if !path.exists() {
            return Err(RetroError::BoardNotFound { id: id.to_string() });
        }

        let content = fs::read_to_string(&path).await?;
        let board: Board = serde_json::from_str(&content)?;
        Ok(board)
    }

    /// Write a board file (atomic write via temp file)
    pub async fn write_board(&self, board: &Board) -> Result<()> {
        let path = self.board_path(&board.id);
        let content = serde_json::to_string_pretty(board)?;
        atomic_write(&path, content.as_bytes()).await
    }

    // =========================================================================
    // Card I/O
    // =========================================================================

    /// Read a card file
    pub async fn read_card(&self, board_id: &BoardId, id: &CardId) -> Result<Card> {
        let path = self.card_path(board_id, id);
        if !path.exists() {
            return Err(RetroError::CardNotFound { id: id.to_string() });
        }

        let content = fs::read_to_string(&path).await?;
        let card: Card = serde_json::from_str(&content)?;
        Ok(card)
    }

    /// Write a card file (atomic write via temp file)
    pub async fn write_card(&self, card: &Card) -> Result<()> {
        let path = self.card_path(&card.board_id, &card.id);
        let content = serde_json::to_string_pretty(card)?;
        atomic_write(&path, content.as_bytes()).await
    }

    /// Delete a card file
    pub async fn delete_card_file(&self, board_id: &BoardId, id: &CardId) -> Result<()> {
        let path = self.card_path(board_id, id);
        if path.exists() {
            fs::remove_file(&path).await?;
        }
        Ok(())
    }

    /// List all card IDs on a board
    pub async fn list_card_ids(&self, board_id: &BoardId) -> Result<Vec<CardId>> {
        Ok(list_json_stems(self.cards_dir(board_id))
            .await?
            .into_iter()
            .map(CardId::from_string)
            .collect())
    }

    /// Read all cards on a board
    pub async fn read_all_cards(&self, board_id: &BoardId) -> Result<Vec<Card>> {
        let ids = self.list_card_ids(board_id).await?;
        let mut cards = Vec::with_capacity(ids.len());

        for id in ids {
            cards.push(self.read_card(board_id, &id).await?);
        }

        Ok(cards)
    }

    // =========================================================================
    // Reaction I/O
    // =========================================================================

    /// Write a reaction file (atomic write via temp file)
    pub async fn write_reaction(&self, board_id: &BoardId, reaction: &Reaction) -> Result<()> {
        let path = self.reaction_path(board_id, &reaction.id);
        let content = serde_json::to_string_pretty(reaction)?;
        atomic_write(&path, content.as_bytes()).await
    }

    /// Delete a reaction file
    pub async fn delete_reaction_file(&self, board_id: &BoardId, id: &ReactionId) -> Result<()> {
        let path = self.reaction_path(board_id, id);
        if path.exists() {
            fs::remove_file(&path).await?;
        }
        Ok(())
    }

    /// List all reaction IDs on a board
    pub async fn list_reaction_ids(&self, board_id: &BoardId) -> Result<Vec<ReactionId>> {
        Ok(list_json_stems(self.reactions_dir(board_id))
            .await?
            .into_iter()
            .map(ReactionId::from_string)
            .collect())
    }

    /// Read all reactions on a board
    pub async fn read_all_reactions(&self, board_id: &BoardId) -> Result<Vec<Reaction>> {
        let ids = self.list_reaction_ids(board_id).await?;
        let mut reactions = Vec::with_capacity(ids.len());

        for id in ids {
            let content = fs::read_to_string(self.reaction_path(board_id, &id)).await?;
            reactions.push(serde_json::from_str(&content)?);
        }

        Ok(reactions)
    }

    /// Look up a reaction by its ledger uniqueness key
    pub async fn find_reaction(
        &self,
        board_id: &BoardId,
        card_id: &CardId,
        user_hash: &UserHash,
        reaction_type: ReactionType,
    ) -> Result<Option<Reaction>> {
        let reactions = self.read_all_reactions(board_id).await?;
        Ok(reactions
            .into_iter()
            .find(|r| r.matches_key(card_id, user_hash, reaction_type)))
    }

    // =========================================================================
    // Session I/O
    // =========================================================================

    /// Write a session file (atomic write via temp file). Writing an existing
    /// `(board, user)` key replaces the previous session.
    pub async fn write_session(&self, session: &UserSession) -> Result<()> {
        let path = self.session_path(&session.board_id, &session.user_hash);
        let content = serde_json::to_string_pretty(session)?;
        atomic_write(&path, content.as_bytes()).await
    }

    /// Delete a session file
    pub async fn delete_session_file(
        &self,
        board_id: &BoardId,
        user_hash: &UserHash,
    ) -> Result<()> {
        let path = self.session_path(board_id, user_hash);
        if path.exists() {
            fs::remove_file(&path).await?;
        }
        Ok(())
    }

    /// Read all sessions on a board
    pub async fn read_all_sessions(&self, board_id: &BoardId) -> Result<Vec<UserSession>> {
        let hashes = list_json_stems(self.sessions_dir(board_id)).await?;
        let mut sessions = Vec::with_capacity(hashes.len());

        for hash in hashes {
            let path = self.session_path(board_id, &UserHash::from_string(&hash));
            let content = fs::read_to_string(&path).await?;
            sessions.push(serde_json::from_str(&content)?);
        }

        Ok(sessions)
    }

    // =========================================================================
    // Activity logging
    // =========================================================================

    /// Append a log entry, routed to the scoped board's activity log or the
    /// global one when the entry carries no scope
    pub async fn append_activity(&self, entry: &LogEntry) -> Result<()> {
        let path = match &entry.scope {
            Some(board) => self.activity_path(&BoardId::from_string(board.clone())),
            None => self.global_activity_path(),
        };
        append_log(&path, entry).await
    }

    /// Read activity log entries, newest first
    pub async fn read_activity(
        &self,
        board_id: Option<&BoardId>,
        limit: Option<usize>,
    ) -> Result<Vec<LogEntry>> {
        let path = match board_id {
            Some(id) => self.activity_path(id),
            None => self.global_activity_path(),
        };
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path).await?;
        let mut entries: Vec<LogEntry> = content
            .lines()
            .filter(|line| !line.is_empty())
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect();

        // Newest first
        entries.reverse();

        if let Some(limit) = limit {
            entries.truncate(limit);
        }

        Ok(entries)
    }

    // =========================================================================
    // Locking
    // =========================================================================

    /// Acquire the board's writer lock.
    ///
    /// In-process writers queue on a per-board async mutex; the advisory file
    /// lock guards against other processes and is retried briefly before
    /// failing with `LockBusy`. The returned guard releases both on drop.
    pub async fn lock_board(&self, board_id: &BoardId) -> Result<BoardGuard> {
        if !self.board_exists(board_id) {
            return Err(RetroError::BoardNotFound {
                id: board_id.to_string(),
            });
        }

        let cell = {
            let mut locks = self
                .board_locks
                .lock()
                .expect("board lock registry poisoned");
            locks
                .entry(board_id.clone())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
                .clone()
        };
        let queue = cell.lock_owned().await;

        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(self.lock_path(board_id))?;

        for attempt in 0..LOCK_RETRY_ATTEMPTS {
            match file.try_lock_exclusive() {
                Ok(()) => {
                    return Ok(BoardGuard {
                        _queue: queue,
                        file,
                    });
                }
                Err(_) if attempt + 1 < LOCK_RETRY_ATTEMPTS => {
                    tracing::debug!(board = %board_id, attempt, "board lock contended, retrying");
                    tokio::time::sleep(LOCK_RETRY_DELAY).await;
                }
                Err(_) => break,
            }
        }

        Err(RetroError::LockBusy)
    }
}

#[async_trait]
impl ActivitySink<RetroError> for RetroContext {
    async fn record_activity(&self, entry: &LogEntry) -> Result<()> {
        self.append_activity(entry).await
    }
}

/// RAII writer-lock guard - releases the in-process mutex and the file lock
/// on drop
pub struct BoardGuard {
    _queue: tokio::sync::OwnedMutexGuard<()>,
    file: std::fs::File,
}

impl Drop for BoardGuard {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

/// Atomic write via temp file and rename
async fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    // Write to temp file in same directory
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).await?;

    // Rename (atomic on same filesystem)
    fs::rename(&temp_path, path).await?;

    Ok(())
}

/// Append a log entry to a JSONL file
async fn append_log(path: &Path, entry: &LogEntry) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let mut line = serde_json::to_string(entry)?;
    line.push('\n');

    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;

    file.write_all(line.as_bytes()).await?;
    file.flush().await?;

    Ok(())
}

/// File stems of every `.json` entry in a directory; empty when the
/// directory does not exist
async fn list_json_stems(dir: PathBuf) -> Result<Vec<String>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut stems = Vec::new();
    let mut entries = fs::read_dir(&dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("json") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                stems.push(stem.to_string());
            }
        }
    }

    Ok(stems)
}

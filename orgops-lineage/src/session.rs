//! LineageSession - which editor, if any, is open
//!
//! A session is `Closed`, `Creating` a new lineage, or `Editing` an existing
//! one. Creating and editing at the same time cannot be represented.
//!
//! Store failures during submit and delete are logged here and returned as
//! outcomes rather than errors. The session keeps the editor open on failure
//! so the user's edits survive.

use crate::editor::{HierarchyEditor, SaveBlocker};
use crate::error::{LineageError, Result};
use crate::store::LineageStore;
use crate::types::{CompanyId, Lineage};
use tracing::{debug, error, info};

#[derive(Debug, Default)]
pub enum LineageSession {
    #[default]
    Closed,
    Creating(HierarchyEditor),
    Editing {
        name: String,
        editor: HierarchyEditor,
    },
}

/// Result of submitting the open editor
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Persisted; the session is closed
    Saved(Lineage),
    /// Save is not allowed yet; the session stays open
    Blocked(SaveBlocker),
    /// The store rejected the save; the session stays open
    Failed(LineageError),
}

/// Result of deleting a lineage from the list view
#[derive(Debug)]
pub enum DeleteOutcome {
    Deleted,
    Failed(LineageError),
}

impl LineageSession {
    pub fn new() -> Self {
        Self::Closed
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// Name of the lineage being edited, if any
    pub fn editing_name(&self) -> Option<&str> {
        match self {
            Self::Editing { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn editor(&self) -> Option<&HierarchyEditor> {
        match self {
            Self::Closed => None,
            Self::Creating(editor) | Self::Editing { editor, .. } => Some(editor),
        }
    }

    pub fn editor_mut(&mut self) -> Option<&mut HierarchyEditor> {
        match self {
            Self::Closed => None,
            Self::Creating(editor) | Self::Editing { editor, .. } => Some(editor),
        }
    }

    /// Open an empty editor over every position of the tenant
    pub async fn open_create(&mut self, store: &dyn LineageStore) -> Result<()> {
        self.ensure_closed()?;
        let positions = store.fetch_positions().await?;
        debug!(positions = positions.len(), "opened create session");
        *self = Self::Creating(HierarchyEditor::create(positions));
        Ok(())
    }

    /// Open an editor hydrated from the stored rows of `name`
    pub async fn open_edit(
        &mut self,
        store: &dyn LineageStore,
        name: &str,
        company_id: CompanyId,
    ) -> Result<()> {
        self.ensure_closed()?;
        let positions = store.fetch_positions().await?;
        let rows = store.fetch_lineages().await?;
        let editor = HierarchyEditor::hydrate(name, positions, &rows, company_id)?;
        debug!(lineage = name, "opened edit session");
        *self = Self::Editing {
            name: name.to_string(),
            editor,
        };
        Ok(())
    }

    /// Discard the open editor without saving
    pub fn close(&mut self) {
        *self = Self::Closed;
    }

    /// Save the open editor
    pub async fn submit(&mut self, store: &dyn LineageStore) -> Result<SubmitOutcome> {
        let editor = self.editor_mut().ok_or(LineageError::SessionClosed)?;

        if let Some(blocker) = editor.save_blocker() {
            return Ok(SubmitOutcome::Blocked(blocker));
        }

        match editor.save(store).await {
            Ok(lineage) => {
                self.close();
                Ok(SubmitOutcome::Saved(lineage))
            }
            Err(e) => {
                error!(lineage = %editor.name(), error = %e, "failed to save lineage");
                Ok(SubmitOutcome::Failed(e))
            }
        }
    }

    /// Delete a lineage by name
    ///
    /// Works from any session state; an open editor is left untouched.
    pub async fn delete(&self, store: &dyn LineageStore, name: &str) -> DeleteOutcome {
        match store.delete_lineage(name).await {
            Ok(()) => {
                info!(lineage = name, "deleted lineage");
                DeleteOutcome::Deleted
            }
            Err(e) => {
                error!(lineage = name, error = %e, "failed to delete lineage");
                DeleteOutcome::Failed(e)
            }
        }
    }

    fn ensure_closed(&self) -> Result<()> {
        if self.is_open() {
            Err(LineageError::SessionBusy)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::{HierarchyLevel, LineageRow, LineageUpdateRow, NewLineageRow, Position, PositionId};
    use async_trait::async_trait;
    use tracing_test::traced_test;

    fn store() -> MemoryStore {
        MemoryStore::new(CompanyId::new(2)).with_positions(vec![
            Position::new(1, "Director"),
            Position::new(2, "Manager"),
            Position::new(3, "Lead"),
        ])
    }

    /// Serves positions and rows but refuses every write
    struct ReadOnlyStore(MemoryStore);

    #[async_trait]
    impl LineageStore for ReadOnlyStore {
        async fn fetch_positions(&self) -> Result<Vec<Position>> {
            self.0.fetch_positions().await
        }

        async fn fetch_lineages(&self) -> Result<Vec<LineageRow>> {
            self.0.fetch_lineages().await
        }

        async fn create_lineage(&self, _rows: &[NewLineageRow]) -> Result<()> {
            Err(std::io::Error::other("backend unavailable").into())
        }

        async fn update_lineage(&self, _rows: &[LineageUpdateRow]) -> Result<()> {
            Err(std::io::Error::other("backend unavailable").into())
        }

        async fn delete_lineage(&self, _name: &str) -> Result<()> {
            Err(std::io::Error::other("backend unavailable").into())
        }
    }

    #[tokio::test]
    async fn test_create_then_submit_closes() {
        let store = store();
        let mut session = LineageSession::new();
        session.open_create(&store).await.unwrap();
        assert!(matches!(session, LineageSession::Creating(_)));

        let editor = session.editor_mut().unwrap();
        editor.add_level();
        editor.set_name("Ops Chain");

        let outcome = session.submit(&store).await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Saved(_)));
        assert!(!session.is_open());
    }

    #[tokio::test]
    async fn test_cannot_open_twice() {
        let store = store();
        let mut session = LineageSession::new();
        session.open_create(&store).await.unwrap();

        let err = session.open_create(&store).await.unwrap_err();
        assert!(matches!(err, LineageError::SessionBusy));
        assert!(matches!(session, LineageSession::Creating(_)));
    }

    #[tokio::test]
    async fn test_open_edit_hydrates() {
        let store = store().with_rows(vec![
            LineageRow {
                name: "Ops Chain".into(),
                position_id: PositionId::new(1),
                hierarchical_level: 1,
                company_id: CompanyId::new(2),
            },
            LineageRow {
                name: "Ops Chain".into(),
                position_id: PositionId::new(2),
                hierarchical_level: 2,
                company_id: CompanyId::new(2),
            },
        ]);

        let mut session = LineageSession::new();
        session
            .open_edit(&store, "Ops Chain", CompanyId::new(2))
            .await
            .unwrap();

        assert_eq!(session.editing_name(), Some("Ops Chain"));
        let editor = session.editor().unwrap();
        assert_eq!(editor.name(), "Ops Chain");
        assert_eq!(
            editor.levels(),
            &[HierarchyLevel::assigned(1, 1), HierarchyLevel::assigned(2, 2)]
        );

        let outcome = session.submit(&store).await.unwrap();
        assert!(matches!(
            outcome,
            SubmitOutcome::Blocked(SaveBlocker::Unchanged)
        ));
        assert!(session.is_open());
    }

    #[tokio::test]
    async fn test_open_edit_unknown_stays_closed() {
        let store = store();
        let mut session = LineageSession::new();
        let err = session
            .open_edit(&store, "Ghost", CompanyId::new(2))
            .await
            .unwrap_err();
        assert!(matches!(err, LineageError::LineageNotFound { .. }));
        assert!(!session.is_open());
    }

    #[tokio::test]
    async fn test_submit_without_session() {
        let mut session = LineageSession::new();
        let err = session.submit(&store()).await.unwrap_err();
        assert!(matches!(err, LineageError::SessionClosed));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_store_failure_is_logged_and_keeps_editor() {
        let store = ReadOnlyStore(store());
        let mut session = LineageSession::new();
        session.open_create(&store).await.unwrap();

        let editor = session.editor_mut().unwrap();
        editor.add_level();
        editor.add_level();
        editor.set_name("Ops Chain");

        let outcome = session.submit(&store).await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Failed(LineageError::Io(_))));
        assert!(logs_contain("failed to save lineage"));

        let editor = session.editor().unwrap();
        assert_eq!(editor.levels().len(), 2);
        assert_eq!(editor.name(), "Ops Chain");
    }

    #[tokio::test]
    #[traced_test]
    async fn test_delete_failure_is_logged() {
        let store = ReadOnlyStore(store());
        let session = LineageSession::new();
        let outcome = session.delete(&store, "Ops Chain").await;
        assert!(matches!(outcome, DeleteOutcome::Failed(_)));
        assert!(logs_contain("failed to delete lineage"));
    }
}

//! Lifecycle coordinator
//!
//! Moves the session between `Input`, `Results` and `Finalized`, tracks the
//! active dialog, and routes every user action through one exhaustive match.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::combine::CombineSelector;
use crate::controller::{ControllerError, EnrichmentController, EnrichmentOutcome, IdeaAction};
use crate::domain::{Brief, Idea, IdeaId};
use crate::enrich::{EnrichmentKind, EnrichmentService};
use crate::store::IdeaStore;

use super::action::{ActionOutcome, ActiveDialog, DialogMode, DialogView, SessionAction};
use super::error::SessionError;

/// Overall session state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for a brief
    Input,
    /// Ideas generated and being worked on
    Results,
    /// One idea chosen; terminal until start over
    Finalized(Box<Idea>),
}

impl SessionPhase {
    pub fn name(&self) -> &'static str {
        match self {
            SessionPhase::Input => "input",
            SessionPhase::Results => "results",
            SessionPhase::Finalized(_) => "finalized",
        }
    }
}

/// A brainstorming session
pub struct Session {
    phase: SessionPhase,
    brief: Option<Brief>,
    dialog: Option<ActiveDialog>,
    service: Arc<dyn EnrichmentService>,
    controller: EnrichmentController,
    combine: CombineSelector,
}

impl Session {
    /// Create a session in `Input` over a fresh idea store
    ///
    /// # Panics
    ///
    /// Spawns the store actor, so it must be called from within a Tokio runtime.
    pub fn new(service: Arc<dyn EnrichmentService>) -> Self {
        debug!("Session::new: called");
        let store = IdeaStore::spawn();
        let controller = EnrichmentController::new(service.clone(), store);
        Self {
            phase: SessionPhase::Input,
            brief: None,
            dialog: None,
            service,
            combine: CombineSelector::new(controller.clone()),
            controller,
        }
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn brief(&self) -> Option<&Brief> {
        self.brief.as_ref()
    }

    pub fn active_dialog(&self) -> Option<ActiveDialog> {
        self.dialog
    }

    pub fn controller(&self) -> &EnrichmentController {
        &self.controller
    }

    pub fn store(&self) -> &IdeaStore {
        self.controller.store()
    }

    pub fn combine(&self) -> &CombineSelector {
        &self.combine
    }

    /// The finalized idea as pretty JSON
    pub fn export_finalized(&self) -> Option<String> {
        match &self.phase {
            SessionPhase::Finalized(idea) => serde_json::to_string_pretty(idea.as_ref()).ok(),
            _ => None,
        }
    }

    /// Rebuild the active dialog from the latest store state
    ///
    /// A dialog whose idea has been removed shows nothing.
    pub async fn dialog_view(&self) -> Result<Option<DialogView>, SessionError> {
        let Some(dialog) = self.dialog else {
            return Ok(None);
        };
        self.view(dialog).await
    }

    async fn view(&self, dialog: ActiveDialog) -> Result<Option<DialogView>, SessionError> {
        let idea = self.store().get(dialog.idea_id).await?;
        Ok(idea.map(|idea| DialogView {
            idea,
            mode: dialog.mode,
            pending: self.controller.pending_kind(dialog.idea_id),
        }))
    }

    fn require_results(&self, action: &'static str) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::Results => Ok(()),
            _ => Err(SessionError::WrongPhase {
                action,
                phase: self.phase.name(),
            }),
        }
    }

    fn require_brief(&self) -> Result<Brief, SessionError> {
        self.brief.clone().ok_or(SessionError::WrongPhase {
            action: "expand",
            phase: self.phase.name(),
        })
    }

    fn refine_dialog(&self) -> Result<IdeaId, SessionError> {
        match self.dialog {
            Some(ActiveDialog {
                idea_id,
                mode: DialogMode::Refine,
            }) => Ok(idea_id),
            _ => Err(SessionError::NoRefineDialog),
        }
    }

    /// Apply one user action
    pub async fn dispatch(&mut self, action: SessionAction) -> Result<ActionOutcome, SessionError> {
        let name = action.name();
        debug!(action = name, phase = self.phase.name(), "dispatch: called");
        match action {
            SessionAction::Generate(brief) => {
                if self.phase != SessionPhase::Input {
                    return Err(SessionError::WrongPhase {
                        action: name,
                        phase: self.phase.name(),
                    });
                }
                self.generate(brief).await
            }
            SessionAction::Like(id) => {
                self.require_results(name)?;
                Ok(match self.store().like(id).await? {
                    Some(likes) => ActionOutcome::Liked { id, likes },
                    None => ActionOutcome::Ignored(format!("idea {} not found", id)),
                })
            }
            SessionAction::ToggleFavorite(id) => {
                self.require_results(name)?;
                Ok(match self.store().toggle_favorite(id).await? {
                    Some(favorited) => ActionOutcome::Favorited { id, favorited },
                    None => ActionOutcome::Ignored(format!("idea {} not found", id)),
                })
            }
            SessionAction::OpenDialog { id, mode } => {
                self.require_results(name)?;
                self.open_dialog(id, mode).await
            }
            SessionAction::CloseDialog => {
                self.require_results(name)?;
                // Nothing is cancelled; a pending result still lands in the store
                self.dialog = None;
                Ok(ActionOutcome::DialogClosed)
            }
            SessionAction::SendChat { message } => {
                self.require_results(name)?;
                let id = self.refine_dialog()?;
                if message.trim().is_empty() {
                    return Ok(ActionOutcome::Ignored("empty message".to_string()));
                }
                self.controller.request(id, IdeaAction::Chat { message }).await?;
                Ok(ActionOutcome::Started {
                    ids: vec![id],
                    kind: EnrichmentKind::Chat,
                })
            }
            SessionAction::ApplyChat => {
                self.require_results(name)?;
                let id = self.refine_dialog()?;
                self.controller.request(id, IdeaAction::Refine).await?;
                Ok(ActionOutcome::Started {
                    ids: vec![id],
                    kind: EnrichmentKind::Refine,
                })
            }
            SessionAction::ToggleCombine(id) => {
                self.require_results(name)?;
                let change = self.combine.toggle(id).await?;
                let selected = self.combine.selection().await?;
                Ok(ActionOutcome::Selection { change, selected })
            }
            SessionAction::ConfirmCombine => {
                self.require_results(name)?;
                let selected = self.combine.selection().await?;
                Ok(match self.combine.confirm().await? {
                    Some(_) => ActionOutcome::Started {
                        ids: selected,
                        kind: EnrichmentKind::Combine,
                    },
                    None => ActionOutcome::Ignored("select exactly two ideas to combine".to_string()),
                })
            }
            SessionAction::CancelCombine => {
                self.require_results(name)?;
                self.combine.cancel().await?;
                Ok(ActionOutcome::SelectionCleared)
            }
            SessionAction::Finalize(id) => {
                self.require_results(name)?;
                self.finalize(id).await
            }
            SessionAction::StartOver => {
                let removed = self.store().reset().await?;
                info!(removed, from = self.phase.name(), "Session reset to input");
                self.phase = SessionPhase::Input;
                self.brief = None;
                self.dialog = None;
                Ok(ActionOutcome::Reset)
            }
        }
    }

    async fn generate(&mut self, brief: Brief) -> Result<ActionOutcome, SessionError> {
        debug!(subject = %brief.subject, "generate: called");
        brief.validate()?;

        match self.service.generate(&brief).await {
            Ok(drafts) => {
                let ideas = self.store().replace_all(drafts).await?;
                info!(count = ideas.len(), "Ideas generated, session in results");
                self.phase = SessionPhase::Results;
                self.brief = Some(brief);
                self.dialog = None;
                Ok(ActionOutcome::Generated(ideas))
            }
            Err(e) => {
                warn!(error = %e, "Idea generation failed");
                Ok(ActionOutcome::Failed(e.to_string()))
            }
        }
    }

    async fn open_dialog(&mut self, id: IdeaId, mode: DialogMode) -> Result<ActionOutcome, SessionError> {
        debug!(idea_id = %id, ?mode, "open_dialog: called");
        let idea = self.store().get(id).await?.ok_or(SessionError::NotFound(id))?;

        if mode == DialogMode::Expand && !idea.is_expanded() {
            let brief = self.require_brief()?;
            match self.controller.request(id, IdeaAction::Expand { brief }).await {
                // An expand already in flight: the dialog shows its loading state
                Ok(_)
                | Err(ControllerError::Busy {
                    kind: EnrichmentKind::Expand,
                    ..
                }) => {}
                Err(e) => return Err(e.into()),
            }
        }
        self.dialog = Some(ActiveDialog { idea_id: id, mode });

        let view = self
            .view(ActiveDialog { idea_id: id, mode })
            .await?
            .ok_or(SessionError::NotFound(id))?;
        Ok(ActionOutcome::DialogOpened(view))
    }

    /// Finalize `id`, expanding it first exactly once if needed
    async fn finalize(&mut self, id: IdeaId) -> Result<ActionOutcome, SessionError> {
        debug!(idea_id = %id, "finalize: called");
        let idea = self.store().get(id).await?.ok_or(SessionError::NotFound(id))?;

        let idea = if idea.is_expanded() {
            idea
        } else {
            info!(idea_id = %id, "Finalize needs an expansion, expanding first");
            let brief = self.require_brief()?;
            match self.controller.execute(id, IdeaAction::Expand { brief }).await? {
                EnrichmentOutcome::Applied(idea) if idea.is_expanded() => idea,
                EnrichmentOutcome::Failed(message) => {
                    warn!(idea_id = %id, %message, "Finalize aborted, expansion failed");
                    return Ok(ActionOutcome::Failed(message));
                }
                EnrichmentOutcome::Discarded => return Err(SessionError::NotFound(id)),
                other => {
                    warn!(idea_id = %id, ?other, "Finalize aborted, no expansion landed");
                    return Ok(ActionOutcome::Failed("idea could not be expanded".to_string()));
                }
            }
        };

        info!(idea_id = %id, "Session finalized");
        self.phase = SessionPhase::Finalized(Box::new(idea.clone()));
        self.dialog = None;
        Ok(ActionOutcome::Finalized(Box::new(idea)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combine::SelectionChange;
    use crate::domain::{ChatEntry, fixtures};
    use crate::enrich::mock::MockEnrichmentService;
    use crate::enrich::{EnrichmentError, EnrichmentOutput};

    fn retreat() -> Brief {
        Brief::new("retreat", "remote employees", "What If?")
    }

    async fn results_session(mock: MockEnrichmentService) -> (Session, Arc<MockEnrichmentService>, Vec<Idea>) {
        let mock = Arc::new(mock);
        let mut session = Session::new(mock.clone());
        let ActionOutcome::Generated(ideas) = session.dispatch(SessionAction::Generate(retreat())).await.unwrap() else {
            panic!("generation failed");
        };
        (session, mock, ideas)
    }

    async fn next_completion(events: &mut tokio::sync::broadcast::Receiver<crate::controller::ControllerEvent>) {
        use crate::controller::ControllerEvent;
        loop {
            match events.recv().await.unwrap() {
                ControllerEvent::Started { .. } => continue,
                _ => return,
            }
        }
    }

    #[test]
    #[should_panic]
    fn test_new_outside_runtime_panics() {
        let _ = Session::new(Arc::new(MockEnrichmentService::new()));
    }

    #[tokio::test]
    async fn test_generate_moves_to_results() {
        let (session, _mock, ideas) = results_session(MockEnrichmentService::new()).await;
        assert_eq!(session.phase(), &SessionPhase::Results);
        assert_eq!(ideas.len(), 4);
        assert!(ideas.iter().all(|i| (2..=3).contains(&i.tags.len())));
        assert_eq!(session.brief().unwrap().subject, "retreat");
    }

    #[tokio::test]
    async fn test_generate_failure_stays_in_input() {
        let mock = MockEnrichmentService::new();
        mock.push_batch(Err(EnrichmentError::validation("expected 4 ideas, got 3")));
        let mut session = Session::new(Arc::new(mock));

        let outcome = session.dispatch(SessionAction::Generate(retreat())).await.unwrap();
        assert!(matches!(outcome, ActionOutcome::Failed(_)));
        assert_eq!(session.phase(), &SessionPhase::Input);
        assert!(session.store().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generate_rejected_outside_input() {
        let (mut session, _mock, _ideas) = results_session(MockEnrichmentService::new()).await;
        let err = session.dispatch(SessionAction::Generate(retreat())).await.unwrap_err();
        assert!(matches!(err, SessionError::WrongPhase { action: "generate", .. }));
    }

    #[tokio::test]
    async fn test_results_actions_rejected_in_input() {
        let mut session = Session::new(Arc::new(MockEnrichmentService::new()));
        let err = session.dispatch(SessionAction::Like(IdeaId(1))).await.unwrap_err();
        assert!(matches!(err, SessionError::WrongPhase { phase: "input", .. }));
    }

    #[tokio::test]
    async fn test_generate_then_start_over_is_empty_input() {
        let (mut session, _mock, _ideas) = results_session(MockEnrichmentService::new()).await;
        assert_eq!(session.dispatch(SessionAction::StartOver).await.unwrap(), ActionOutcome::Reset);
        assert_eq!(session.phase(), &SessionPhase::Input);
        assert!(session.store().list().await.unwrap().is_empty());
        assert!(session.brief().is_none());

        // Idempotent
        session.dispatch(SessionAction::StartOver).await.unwrap();
        assert_eq!(session.phase(), &SessionPhase::Input);
    }

    #[tokio::test]
    async fn test_like_and_favorite() {
        let (mut session, _mock, ideas) = results_session(MockEnrichmentService::new()).await;
        let id = ideas[0].id;

        session.dispatch(SessionAction::Like(id)).await.unwrap();
        let outcome = session.dispatch(SessionAction::Like(id)).await.unwrap();
        assert_eq!(outcome, ActionOutcome::Liked { id, likes: 2 });

        session.dispatch(SessionAction::ToggleFavorite(id)).await.unwrap();
        let outcome = session.dispatch(SessionAction::ToggleFavorite(id)).await.unwrap();
        assert_eq!(outcome, ActionOutcome::Favorited { id, favorited: false });

        let outcome = session.dispatch(SessionAction::Like(IdeaId(999))).await.unwrap();
        assert!(matches!(outcome, ActionOutcome::Ignored(_)));
    }

    #[tokio::test]
    async fn test_expand_dialog_expands_once() {
        let (mock, release) = MockEnrichmentService::held();
        let (mut session, mock, ideas) = results_session(mock).await;
        let mut events = session.controller().subscribe_events();
        let id = ideas[2].id;

        let ActionOutcome::DialogOpened(view) = session
            .dispatch(SessionAction::OpenDialog {
                id,
                mode: DialogMode::Expand,
            })
            .await
            .unwrap()
        else {
            panic!("dialog did not open");
        };
        assert!(view.is_loading());
        assert_eq!(session.controller().pending_kind(id), Some(EnrichmentKind::Expand));

        release.add_permits(1);
        next_completion(&mut events).await;
        assert!(!session.controller().is_pending(id));

        session.dispatch(SessionAction::CloseDialog).await.unwrap();
        let ActionOutcome::DialogOpened(view) = session
            .dispatch(SessionAction::OpenDialog {
                id,
                mode: DialogMode::Expand,
            })
            .await
            .unwrap()
        else {
            panic!("dialog did not reopen");
        };
        assert!(view.idea.is_expanded());
        assert!(!view.is_loading());
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_closing_dialog_does_not_cancel_expand() {
        let (mock, release) = MockEnrichmentService::held();
        let (mut session, _mock, ideas) = results_session(mock).await;
        let mut events = session.controller().subscribe_events();
        let id = ideas[0].id;

        session
            .dispatch(SessionAction::OpenDialog {
                id,
                mode: DialogMode::Expand,
            })
            .await
            .unwrap();
        session.dispatch(SessionAction::CloseDialog).await.unwrap();
        assert!(session.dialog_view().await.unwrap().is_none());

        release.add_permits(1);
        next_completion(&mut events).await;
        assert!(session.store().get(id).await.unwrap().unwrap().is_expanded());
    }

    #[tokio::test]
    async fn test_refine_dialog_does_not_expand() {
        let (mut session, mock, ideas) = results_session(MockEnrichmentService::new()).await;
        session
            .dispatch(SessionAction::OpenDialog {
                id: ideas[0].id,
                mode: DialogMode::Refine,
            })
            .await
            .unwrap();
        assert_eq!(mock.call_count(), 0);
        assert!(!session.controller().is_pending(ideas[0].id));
    }

    #[tokio::test]
    async fn test_expand_dialog_while_chat_pending_is_busy() {
        let (mock, release) = MockEnrichmentService::held();
        let (mut session, mock, ideas) = results_session(mock).await;
        let mut events = session.controller().subscribe_events();
        let id = ideas[0].id;

        session
            .dispatch(SessionAction::OpenDialog {
                id,
                mode: DialogMode::Refine,
            })
            .await
            .unwrap();
        session
            .dispatch(SessionAction::SendChat {
                message: "cheaper?".to_string(),
            })
            .await
            .unwrap();

        let err = session
            .dispatch(SessionAction::OpenDialog {
                id,
                mode: DialogMode::Expand,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Controller(ControllerError::Busy {
                kind: EnrichmentKind::Chat,
                ..
            })
        ));
        // The refine dialog stays open and shows the chat in flight
        assert_eq!(
            session.active_dialog(),
            Some(ActiveDialog {
                idea_id: id,
                mode: DialogMode::Refine
            })
        );

        release.add_permits(1);
        next_completion(&mut events).await;
        assert_eq!(mock.kinds(), vec![EnrichmentKind::Chat]);

        // Once idle, the expand goes through
        let ActionOutcome::DialogOpened(view) = session
            .dispatch(SessionAction::OpenDialog {
                id,
                mode: DialogMode::Expand,
            })
            .await
            .unwrap()
        else {
            panic!("dialog did not open");
        };
        assert!(view.is_loading());
        assert_eq!(mock.kinds(), vec![EnrichmentKind::Chat, EnrichmentKind::Expand]);
        release.add_permits(1);
        next_completion(&mut events).await;
    }

    #[tokio::test]
    async fn test_chat_then_apply() {
        let mock = MockEnrichmentService::new();
        mock.push_result(Ok(EnrichmentOutput::Reply("Try a cabin".to_string())));
        let (mut session, _mock, ideas) = results_session(mock).await;
        let mut events = session.controller().subscribe_events();
        let id = ideas[1].id;

        let err = session
            .dispatch(SessionAction::SendChat {
                message: "cheaper?".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::NoRefineDialog));

        session
            .dispatch(SessionAction::OpenDialog {
                id,
                mode: DialogMode::Refine,
            })
            .await
            .unwrap();
        session
            .dispatch(SessionAction::SendChat {
                message: "cheaper?".to_string(),
            })
            .await
            .unwrap();
        next_completion(&mut events).await;

        let view = session.dialog_view().await.unwrap().unwrap();
        assert_eq!(
            view.idea.chat_history,
            vec![ChatEntry::user("cheaper?"), ChatEntry::ai("Try a cabin")]
        );
        assert_eq!(view.idea.title, ideas[1].title);

        session.dispatch(SessionAction::ApplyChat).await.unwrap();
        next_completion(&mut events).await;
        let view = session.dialog_view().await.unwrap().unwrap();
        assert_eq!(view.idea.title, format!("{} (refined)", ideas[1].title));
        assert_eq!(view.idea.chat_history.len(), 2);
    }

    #[tokio::test]
    async fn test_chat_failure_appends_nothing() {
        let mock = MockEnrichmentService::new();
        mock.push_failure("network down");
        let (mut session, _mock, ideas) = results_session(mock).await;
        let mut events = session.controller().subscribe_events();
        let id = ideas[0].id;

        session
            .dispatch(SessionAction::OpenDialog {
                id,
                mode: DialogMode::Refine,
            })
            .await
            .unwrap();
        session
            .dispatch(SessionAction::SendChat {
                message: "hello".to_string(),
            })
            .await
            .unwrap();
        next_completion(&mut events).await;

        assert!(session.store().get(id).await.unwrap().unwrap().chat_history.is_empty());
        assert!(!session.controller().is_pending(id));
    }

    #[tokio::test]
    async fn test_combine_flow() {
        let (mut session, _mock, ideas) = results_session(MockEnrichmentService::new()).await;
        let mut events = session.controller().subscribe_events();
        let (a, b, c) = (ideas[0].id, ideas[1].id, ideas[2].id);

        session.dispatch(SessionAction::ToggleCombine(a)).await.unwrap();
        let outcome = session.dispatch(SessionAction::ToggleCombine(b)).await.unwrap();
        assert_eq!(
            outcome,
            ActionOutcome::Selection {
                change: SelectionChange::Selected,
                selected: vec![a, b]
            }
        );
        let outcome = session.dispatch(SessionAction::ToggleCombine(c)).await.unwrap();
        assert!(matches!(
            outcome,
            ActionOutcome::Selection {
                change: SelectionChange::Full,
                ..
            }
        ));

        session.dispatch(SessionAction::ConfirmCombine).await.unwrap();
        next_completion(&mut events).await;

        let all = session.store().list().await.unwrap();
        assert_eq!(all.len(), 5);
        let new_id = all[4].id;
        assert!(ideas.iter().all(|i| i.id != new_id));
        assert!(session.combine().selection().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_finalize_expands_first() {
        let (mut session, mock, ideas) = results_session(MockEnrichmentService::new()).await;
        let id = ideas[0].id;

        let outcome = session.dispatch(SessionAction::Finalize(id)).await.unwrap();
        let ActionOutcome::Finalized(idea) = outcome else {
            panic!("expected finalized, got {:?}", outcome);
        };
        assert!(idea.is_expanded());
        assert_eq!(mock.kinds(), vec![EnrichmentKind::Expand]);
        assert!(matches!(session.phase(), SessionPhase::Finalized(_)));
        assert!(session.export_finalized().unwrap().contains("\"expandedData\""));
    }

    #[tokio::test]
    async fn test_finalize_expanded_idea_skips_call() {
        let (mut session, mock, ideas) = results_session(MockEnrichmentService::new()).await;
        let id = ideas[0].id;
        session
            .store()
            .update(id, crate::domain::IdeaPatch::expanded(fixtures::expanded("done")))
            .await
            .unwrap();

        let outcome = session.dispatch(SessionAction::Finalize(id)).await.unwrap();
        assert!(matches!(outcome, ActionOutcome::Finalized(_)));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_finalize_failure_stays_in_results() {
        let mock = MockEnrichmentService::new();
        mock.push_failure("timeout");
        let (mut session, _mock, ideas) = results_session(mock).await;

        let outcome = session.dispatch(SessionAction::Finalize(ideas[0].id)).await.unwrap();
        assert!(matches!(outcome, ActionOutcome::Failed(ref m) if m.contains("timeout")));
        assert_eq!(session.phase(), &SessionPhase::Results);
        assert!(session.export_finalized().is_none());
    }

    #[tokio::test]
    async fn test_finalize_while_expand_pending_is_busy() {
        let (mock, release) = MockEnrichmentService::held();
        let (mut session, _mock, ideas) = results_session(mock).await;
        let id = ideas[0].id;

        session
            .dispatch(SessionAction::OpenDialog {
                id,
                mode: DialogMode::Expand,
            })
            .await
            .unwrap();
        let err = session.dispatch(SessionAction::Finalize(id)).await.unwrap_err();
        assert!(matches!(err, SessionError::Controller(ControllerError::Busy { .. })));
        assert_eq!(session.phase(), &SessionPhase::Results);
        release.add_permits(1);
    }

    #[tokio::test]
    async fn test_result_after_start_over_is_discarded() {
        let (mock, release) = MockEnrichmentService::held();
        let (mut session, _mock, ideas) = results_session(mock).await;
        let mut events = session.controller().subscribe_events();

        session
            .dispatch(SessionAction::OpenDialog {
                id: ideas[0].id,
                mode: DialogMode::Expand,
            })
            .await
            .unwrap();
        session.dispatch(SessionAction::StartOver).await.unwrap();
        release.add_permits(1);

        events.recv().await.unwrap();
        assert!(matches!(
            events.recv().await.unwrap(),
            crate::controller::ControllerEvent::Discarded { .. }
        ));
        assert!(session.store().list().await.unwrap().is_empty());
        assert_eq!(session.phase(), &SessionPhase::Input);
    }
}

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tomata_client::domain::{Phase, TimerSettings};

#[derive(Debug, Clone)]
pub(super) enum Action {
    /// Start the next session (authority's choice) or stop the running one.
    ToggleStartStop,
    /// Stop whatever runs and start the given phase instead.
    SwitchPhase(Phase),
    /// Natural expiry: complete, re-fetch sequence info, start the
    /// recommended next phase.
    CompleteAndAdvance,
    /// Periodic background re-fetch of sequence info.
    RefreshSequence,
    /// Sent only after the user confirmed the reset dialog.
    ResetSequence,
    /// Settings collaborator notification; affects the next phase only.
    SettingsChanged(TimerSettings),
    /// Re-adopt the authoritative session, discarding optimistic state.
    ReloadFromServer,
}

pub(super) type ActionTx = UnboundedSender<Action>;
pub(super) type ActionRx = UnboundedReceiver<Action>;

pub(super) fn channel() -> (ActionTx, ActionRx) {
    mpsc::unbounded_channel()
}

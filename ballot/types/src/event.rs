use {
    crate::{ProbeStatus, TallyView, VoteOption, WalletIdentity},
    serde::{Deserialize, Serialize},
    solana_sdk::signature::Signature,
    std::time::Duration,
    strum_macros::Display,
    tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
};

#[derive(Serialize, Deserialize, Display, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Success,
    Warning,
    Error,
}

/// Stages of a single vote, in the order they are entered.
#[derive(Serialize, Deserialize, Display, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FlowState {
    Idle,
    BuildingTx,
    AwaitingSignature,
    Submitting,
    AwaitingConfirmation,
    Committed,
    Aborted,
}

impl FlowState {
    pub fn is_terminal(self) -> bool {
        matches!(self, FlowState::Committed | FlowState::Aborted)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loading {
    Show(String),
    Hide,
}

/// Everything the core tells the presentation layer. Rendering is entirely up
/// to the subscriber.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Toast {
        message: String,
        severity: Severity,
    },
    Loading(Loading),
    Tally(Vec<TallyView>),
    State(FlowState),
    Voted {
        option: VoteOption,
        signature: Signature,
    },
    Identity(Option<WalletIdentity>),
    /// Suggest opening `url` after `delay`.
    ExternalLink {
        url: String,
        delay: Duration,
    },
    Diagnostics(ProbeStatus),
}

/// Sending half of the UI event channel.
///
/// Cheap to clone. Emitting never fails: if nobody is listening any more the
/// event is dropped.
#[derive(Debug, Clone, Default)]
pub struct Presenter {
    sender: Option<UnboundedSender<UiEvent>>,
}

impl Presenter {
    pub fn channel() -> (Self, UnboundedReceiver<UiEvent>) {
        let (sender, receiver) = unbounded_channel();

        (
            Self {
                sender: Some(sender),
            },
            receiver,
        )
    }

    /// A presenter that discards everything.
    pub fn silent() -> Self {
        Self { sender: None }
    }

    pub fn emit(&self, event: UiEvent) {
        if let Some(sender) = &self.sender {
            let _ = sender.send(event);
        }
    }

    pub fn toast<M>(&self, message: M, severity: Severity)
    where
        M: Into<String>,
    {
        self.emit(UiEvent::Toast {
            message: message.into(),
            severity,
        });
    }

    /// Show the loading indicator until the returned guard is dropped.
    #[must_use = "the loading indicator is hidden as soon as the guard is dropped"]
    pub fn loading<L>(&self, label: L) -> LoadingGuard<'_>
    where
        L: Into<String>,
    {
        self.emit(UiEvent::Loading(Loading::Show(label.into())));

        LoadingGuard { presenter: self }
    }
}

/// Keeps the loading indicator visible. Hides it on drop, whichever way the
/// owning scope is left.
pub struct LoadingGuard<'a> {
    presenter: &'a Presenter,
}

impl LoadingGuard<'_> {
    /// Change the label while staying visible.
    pub fn update<L>(&self, label: L)
    where
        L: Into<String>,
    {
        self.presenter
            .emit(UiEvent::Loading(Loading::Show(label.into())));
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.presenter.emit(UiEvent::Loading(Loading::Hide));
    }
}

// ----------------------------------- tests -----------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(receiver: &mut UnboundedReceiver<UiEvent>) -> Vec<UiEvent> {
        let mut events = vec![];
        while let Ok(event) = receiver.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn guard_hides_on_early_return() {
        let (presenter, mut receiver) = Presenter::channel();

        let run = |fail: bool| -> Result<(), ()> {
            let loading = presenter.loading("Working...");
            if fail {
                return Err(());
            }
            loading.update("Almost there...");
            Ok(())
        };

        run(true).unwrap_err();
        assert_eq!(drain(&mut receiver), vec![
            UiEvent::Loading(Loading::Show("Working...".into())),
            UiEvent::Loading(Loading::Hide),
        ]);

        run(false).unwrap();
        assert_eq!(drain(&mut receiver), vec![
            UiEvent::Loading(Loading::Show("Working...".into())),
            UiEvent::Loading(Loading::Show("Almost there...".into())),
            UiEvent::Loading(Loading::Hide),
        ]);
    }

    #[test]
    fn emitting_after_receiver_dropped_is_fine() {
        let (presenter, receiver) = Presenter::channel();
        drop(receiver);

        presenter.toast("nobody is listening", Severity::Warning);
        Presenter::silent().toast("nor here", Severity::Error);
    }
}

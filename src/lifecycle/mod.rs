//! Presentation lifecycle.
//!
//! [`PresentationController`] owns one sheet session at a time: it attaches
//! the sheet to its host, creates the state machine, routes machine effects
//! to the animator and host, and tears the session down when dismissal
//! completes. All positional math stays in [`crate::state`].

use std::rc::Rc;

use tracing::{debug, warn};

use crate::animation::{AnimationId, Animator};
use crate::config::SheetConfig;
use crate::gesture::{DismissPolicy, ReleaseContext, ThresholdPolicy};
use crate::model::{DragSample, PresentError};
use crate::state::{SheetEffect, SheetLayout, SheetMachine, SheetPhase};

/// Surface the sheet is presented on.
///
/// The host's own appear and layout callbacks call into the controller; the
/// controller calls back only through these three methods.
pub trait SheetHost {
    /// Insert the sheet (hidden) into the host's hierarchy.
    fn attach(&mut self);

    /// Remove the sheet from the host's hierarchy without animation.
    fn detach(&mut self);

    /// Current container bounds and final content frame.
    fn layout(&self) -> SheetLayout;
}

type Hook = Box<dyn FnMut()>;

struct Session {
    machine: SheetMachine,
    will_dismiss_fired: bool,
}

/// Drives one bottom sheet through present, interaction and dismissal.
pub struct PresentationController<H: SheetHost, A: Animator> {
    host: H,
    animator: A,
    config: SheetConfig,
    policy: Option<Rc<dyn DismissPolicy>>,
    will_present: Option<Hook>,
    will_dismiss: Option<Hook>,
    session: Option<Session>,
}

impl<H: SheetHost, A: Animator> PresentationController<H, A> {
    /// Hidden controller with the default configuration.
    pub fn new(host: H, animator: A) -> Self {
        Self {
            host,
            animator,
            config: SheetConfig::default(),
            policy: None,
            will_present: None,
            will_dismiss: None,
            session: None,
        }
    }

    /// Replace the staged configuration.
    pub fn with_config(mut self, config: SheetConfig) -> Self {
        self.config = config;
        self
    }

    /// Staged configuration for the next presentation.
    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    /// Edit the staged configuration. An active session keeps the values it
    /// latched when it was presented.
    pub fn config_mut(&mut self) -> &mut SheetConfig {
        &mut self.config
    }

    /// Replace the release policy for the next presentation. Without one, a
    /// [`ThresholdPolicy`] built from the latched config is used.
    pub fn set_dismiss_policy(&mut self, policy: impl DismissPolicy + 'static) {
        self.policy = Some(Rc::new(policy));
    }

    /// Called once per session, right before the entry animation starts.
    pub fn on_will_present(&mut self, hook: impl FnMut() + 'static) {
        self.will_present = Some(Box::new(hook));
    }

    /// Called once per session, when it first starts dismissing.
    pub fn on_will_dismiss(&mut self, hook: impl FnMut() + 'static) {
        self.will_dismiss = Some(Box::new(hook));
    }

    /// Attach the sheet and start the entry animation.
    ///
    /// # Errors
    ///
    /// Returns [`PresentError::AlreadyPresented`] while a session is active,
    /// including while it is still animating out.
    pub fn present(&mut self) -> Result<(), PresentError> {
        if let Some(session) = &self.session {
            warn!(phase = ?session.machine.phase(), "present rejected: sheet already presented");
            return Err(PresentError::AlreadyPresented);
        }

        self.host.attach();
        if let Some(hook) = self.will_present.as_mut() {
            hook();
        }

        let config = self.config.clone();
        let mut machine = match &self.policy {
            Some(policy) => {
                let policy = Rc::clone(policy);
                SheetMachine::with_policy(
                    config,
                    Box::new(move |release: &ReleaseContext| policy.should_dismiss(release)),
                )
            }
            None => {
                let policy = ThresholdPolicy::from_config(&config);
                SheetMachine::with_policy(config, Box::new(policy))
            }
        };

        let layout = self.host.layout();
        debug!(?layout, "presenting sheet");
        let effects = machine.appear(layout);
        self.session = Some(Session {
            machine,
            will_dismiss_fired: false,
        });
        self.apply(effects);
        Ok(())
    }

    /// Dismiss from outside the sheet (backdrop tap). Ignored unless the
    /// sheet is resting or being dragged.
    pub fn request_dismiss(&mut self) {
        let Some(session) = self.session.as_mut() else {
            debug!("dismiss request ignored: nothing presented");
            return;
        };
        let effects = session.machine.request_dismiss();
        self.after_input(effects);
    }

    /// Forward one drag sample from the gesture source.
    pub fn handle_drag(&mut self, sample: DragSample) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let effects = session.machine.drag(sample);
        self.after_input(effects);
    }

    /// Forward a completion reported by the animator.
    pub fn animation_completed(&mut self, id: AnimationId) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let effects = session.machine.animation_completed(id);
        self.after_input(effects);
    }

    /// Phase of the active session, `Hidden` when there is none.
    pub fn phase(&self) -> SheetPhase {
        self.session
            .as_ref()
            .map_or(SheetPhase::Hidden, |session| session.machine.phase())
    }

    /// Whether a session is active, including while it animates out.
    pub fn is_presented(&self) -> bool {
        self.session.is_some()
    }

    /// Read access to the active session's state machine.
    pub fn session(&self) -> Option<&SheetMachine> {
        self.session.as_ref().map(|session| &session.machine)
    }

    /// The sheet host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host, e.g. to record a resize.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The animator effects are routed to.
    pub fn animator(&self) -> &A {
        &self.animator
    }

    /// Mutable access to the animator, for hosts that drive its frames.
    pub fn animator_mut(&mut self) -> &mut A {
        &mut self.animator
    }

    fn after_input(&mut self, effects: Vec<SheetEffect>) {
        if let Some(session) = self.session.as_mut() {
            if session.machine.phase() == SheetPhase::Dismissing && !session.will_dismiss_fired {
                session.will_dismiss_fired = true;
                if let Some(hook) = self.will_dismiss.as_mut() {
                    hook();
                }
            }
        }
        self.apply(effects);
    }

    fn apply(&mut self, effects: Vec<SheetEffect>) {
        for effect in effects {
            match effect {
                SheetEffect::Snap(update) => self.animator.snap(update),
                SheetEffect::Animate(request) => self.animator.animate(request),
                SheetEffect::Detach => {
                    self.host.detach();
                    self.session = None;
                    debug!("sheet detached");
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;

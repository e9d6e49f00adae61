// session.rs — immersive session lifecycle

use std::sync::Arc;
use std::time::Instant;

use winit::window::{Fullscreen, Window};

use crate::error::SessionError;
use crate::positioner::PoseSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImmersiveSession {
    pub id: u64,
    pub started_at: Instant,
}

/// A display that can host immersive sessions.
pub trait PresentationDevice {
    fn supports_immersive(&self) -> bool;
    fn request_session(&mut self, id: u64) -> Result<ImmersiveSession, SessionError>;
    fn end_session(&mut self, session: ImmersiveSession);
    /// Hardware pose, if the device tracks one.
    fn pose_source(&self) -> Option<Arc<dyn PoseSource>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Active(ImmersiveSession),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTransition {
    Started(ImmersiveSession),
    Ended(ImmersiveSession),
}

pub struct SessionManager<D: PresentationDevice> {
    device: D,
    state: SessionState,
    next_id: u64,
}

impl<D: PresentationDevice> SessionManager<D> {
    pub fn new(device: D) -> Self {
        Self {
            device,
            state: SessionState::Idle,
            next_id: 1,
        }
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active(_))
    }

    pub fn begin(&mut self) -> Result<ImmersiveSession, SessionError> {
        if self.is_active() {
            return Err(SessionError::AlreadyActive);
        }
        if !self.device.supports_immersive() {
            return Err(SessionError::Unsupported);
        }

        let session = self.device.request_session(self.next_id)?;
        self.next_id += 1;
        self.state = SessionState::Active(session);
        log::info!("session {} started", session.id);
        Ok(session)
    }

    /// Ends the active session, if any.
    pub fn end(&mut self) -> Option<ImmersiveSession> {
        let SessionState::Active(session) = self.state else {
            return None;
        };
        log::info!("ending session {}", session.id);
        self.device.end_session(session);
        self.state = SessionState::Idle;
        Some(session)
    }

    /// Starts a session when idle, ends the current one otherwise.
    pub fn toggle(&mut self) -> Result<SessionTransition, SessionError> {
        match self.end() {
            Some(session) => Ok(SessionTransition::Ended(session)),
            None => self.begin().map(SessionTransition::Started),
        }
    }
}

/// Desktop stand-in for a headset: sessions present borderless fullscreen, no tracking.
pub struct DesktopDevice {
    window: Arc<Window>,
}

impl DesktopDevice {
    pub fn new(window: Arc<Window>) -> Self {
        Self { window }
    }
}

impl PresentationDevice for DesktopDevice {
    fn supports_immersive(&self) -> bool {
        self.window.current_monitor().is_some()
    }

    fn request_session(&mut self, id: u64) -> Result<ImmersiveSession, SessionError> {
        let monitor = self
            .window
            .current_monitor()
            .ok_or_else(|| SessionError::Device("window has no monitor".to_string()))?;
        self.window
            .set_fullscreen(Some(Fullscreen::Borderless(Some(monitor))));
        Ok(ImmersiveSession {
            id,
            started_at: Instant::now(),
        })
    }

    fn end_session(&mut self, _session: ImmersiveSession) {
        self.window.set_fullscreen(None);
    }

    fn pose_source(&self) -> Option<Arc<dyn PoseSource>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct MockDevice {
        unsupported: bool,
        fail_next: bool,
        presenting: bool,
        ended: Vec<u64>,
    }

    impl PresentationDevice for MockDevice {
        fn supports_immersive(&self) -> bool {
            !self.unsupported
        }

        fn request_session(&mut self, id: u64) -> Result<ImmersiveSession, SessionError> {
            if self.fail_next {
                self.fail_next = false;
                return Err(SessionError::Device("busy".into()));
            }
            self.presenting = true;
            Ok(ImmersiveSession {
                id,
                started_at: Instant::now(),
            })
        }

        fn end_session(&mut self, session: ImmersiveSession) {
            self.presenting = false;
            self.ended.push(session.id);
        }

        fn pose_source(&self) -> Option<Arc<dyn PoseSource>> {
            None
        }
    }

    #[test]
    fn test_toggle_alternates() {
        let mut manager = SessionManager::new(MockDevice::default());
        assert_eq!(manager.state(), SessionState::Idle);

        let started = match manager.toggle().unwrap() {
            SessionTransition::Started(s) => s,
            other => panic!("unexpected {other:?}"),
        };
        assert!(manager.is_active());
        assert!(manager.device().presenting);

        assert_eq!(manager.toggle().unwrap(), SessionTransition::Ended(started));
        assert_eq!(manager.state(), SessionState::Idle);
        assert_eq!(manager.device().ended, vec![started.id]);

        match manager.toggle().unwrap() {
            SessionTransition::Started(s) => assert_eq!(s.id, started.id + 1),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_device_refuses() {
        let device = MockDevice {
            unsupported: true,
            ..Default::default()
        };
        let mut manager = SessionManager::new(device);
        assert_eq!(manager.toggle(), Err(SessionError::Unsupported));
        assert_eq!(manager.state(), SessionState::Idle);
    }

    #[test]
    fn test_begin_twice_is_rejected() {
        let mut manager = SessionManager::new(MockDevice::default());
        manager.begin().unwrap();
        assert_eq!(manager.begin(), Err(SessionError::AlreadyActive));
    }

    #[test]
    fn test_failed_request_stays_idle() {
        let device = MockDevice {
            fail_next: true,
            ..Default::default()
        };
        let mut manager = SessionManager::new(device);
        assert!(matches!(manager.begin(), Err(SessionError::Device(_))));
        assert!(!manager.is_active());
        assert!(manager.begin().is_ok());
    }

    #[test]
    fn test_end_when_idle_is_none() {
        let mut manager = SessionManager::new(MockDevice::default());
        assert_eq!(manager.end(), None);
        assert!(manager.device().ended.is_empty());
    }
}

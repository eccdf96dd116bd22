// Copyright 2025 the Diptych Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::time::Duration;

use diptych_view::{Transform, Transition, TransitionConfig, Viewport};

/// Handle to one started animation.
///
/// Cancelling through a stale handle does nothing once a newer animation has
/// replaced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AnimationHandle(u64);

/// One camera update produced by [`Animator::tick`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    /// Camera to apply.
    pub transform: Transform,
    /// `true` if this is the last frame of the animation.
    pub finished: bool,
}

/// Drives the camera between transforms; last target wins.
#[derive(Clone, Debug)]
pub struct Animator {
    config: TransitionConfig,
    current: Transform,
    running: Option<(AnimationHandle, Transition)>,
    next_id: u64,
}

impl Animator {
    /// Creates an idle animator resting at the identity.
    #[must_use]
    pub fn new(config: TransitionConfig) -> Self {
        Self {
            config,
            current: Transform::IDENTITY,
            running: None,
            next_id: 0,
        }
    }

    /// The camera as of the last [`tick`](Self::tick), jump, or retarget.
    #[must_use]
    pub fn current(&self) -> Transform {
        self.current
    }

    /// Where the camera is heading.
    #[must_use]
    pub fn target(&self) -> Transform {
        self.running
            .as_ref()
            .map_or(self.current, |(_, transition)| transition.target())
    }

    /// Returns `true` while an animation is in flight.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.running.is_some()
    }

    /// Starts animating towards `target` from wherever the camera is at `now`.
    ///
    /// Any animation in flight is superseded.
    pub fn animate_to(
        &mut self,
        target: Transform,
        viewport: Viewport,
        now: Duration,
    ) -> AnimationHandle {
        if let Some((_, transition)) = &self.running {
            self.current = transition.sample(now);
        }
        let handle = AnimationHandle(self.next_id);
        self.next_id += 1;
        let transition = Transition::new(self.current, target, viewport, now, &self.config);
        self.running = Some((handle, transition));
        handle
    }

    /// Moves the camera to `target` immediately, cancelling any animation.
    pub fn jump_to(&mut self, target: Transform) {
        self.running = None;
        self.current = target;
    }

    /// Stops the animation identified by `handle`, leaving the camera where
    /// the last tick put it. Returns `false` if it is no longer running.
    pub fn cancel(&mut self, handle: AnimationHandle) -> bool {
        match &self.running {
            Some((running, _)) if *running == handle => {
                self.running = None;
                true
            }
            _ => false,
        }
    }

    /// Advances the animation to `now`. Returns `None` when idle.
    pub fn tick(&mut self, now: Duration) -> Option<Frame> {
        let (_, transition) = self.running.as_ref()?;
        self.current = transition.sample(now);
        let finished = transition.is_finished(now);
        if finished {
            self.running = None;
        }
        Some(Frame {
            transform: self.current,
            finished,
        })
    }
}

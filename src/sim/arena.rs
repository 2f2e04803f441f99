//! Arena boundary controller
//!
//! The arena is the on-screen "window" the game is played in. Each of its four
//! edges has a current position (what is drawn and collided against) and a
//! target position the current edge chases. The arena shrinks on its own,
//! grows outward where player shots hit an edge, and can run a timed, eased
//! collapse animation when a run starts.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::ArenaTuning;

/// One side of the arena rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom];

    /// Wire index (0 = left, 1 = right, 2 = top, 3 = bottom)
    pub fn index(self) -> usize {
        match self {
            Edge::Left => 0,
            Edge::Right => 1,
            Edge::Top => 2,
            Edge::Bottom => 3,
        }
    }

    /// Checked conversion from a wire index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Axis-aligned rectangle stored as four absolute edge coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Square of side `size` centered on `center`
    pub fn square(center: Vec2, size: f32) -> Self {
        let half = size / 2.0;
        Self::new(
            center.x - half,
            center.x + half,
            center.y - half,
            center.y + half,
        )
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    /// Top-left corner
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width(), self.height())
    }

    pub fn edge(&self, edge: Edge) -> f32 {
        match edge {
            Edge::Left => self.left,
            Edge::Right => self.right,
            Edge::Top => self.top,
            Edge::Bottom => self.bottom,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left
            && point.x <= self.right
            && point.y >= self.top
            && point.y <= self.bottom
    }

    /// Per-edge linear interpolation toward `other`
    pub fn lerp(&self, other: &Rect, t: f32) -> Rect {
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Rect::new(
            mix(self.left, other.left),
            mix(self.right, other.right),
            mix(self.top, other.top),
            mix(self.bottom, other.bottom),
        )
    }
}

/// View that maps world space onto the arena's portion of the screen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipView {
    /// World-space center of the visible region
    pub center: Vec2,
    /// World-space size of the visible region
    pub size: Vec2,
    /// Top-left of the viewport as a fraction of the screen
    pub viewport_pos: Vec2,
    /// Size of the viewport as a fraction of the screen
    pub viewport_size: Vec2,
}

/// In-flight collapse animation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaAnimation {
    pub start: Rect,
    pub target: Rect,
    /// Fraction complete, in [0, 1)
    pub progress: f32,
    /// Total length in seconds
    pub duration: f32,
}

/// Cubic ease-out: fast start, gentle settle
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

/// Smallest duration accepted for an animation (seconds)
const MIN_ANIMATION_DURATION: f32 = 1e-3;

/// The play-area boundary controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    /// Physical screen size the arena lives on
    screen: Vec2,
    current: Rect,
    target: Rect,
    animation: Option<ArenaAnimation>,
    tuning: ArenaTuning,
}

impl Arena {
    /// Square arena of `initial_size` centered on a `screen_w` x `screen_h` screen
    pub fn new(screen_w: f32, screen_h: f32, initial_size: f32, tuning: ArenaTuning) -> Self {
        let screen = if screen_w > 0.0 && screen_h > 0.0 {
            Vec2::new(screen_w, screen_h)
        } else {
            log::warn!("Invalid screen size {screen_w}x{screen_h}, using default");
            Vec2::new(
                crate::consts::DEFAULT_SCREEN_WIDTH,
                crate::consts::DEFAULT_SCREEN_HEIGHT,
            )
        };
        let mut arena = Self {
            screen,
            current: Rect::square(screen / 2.0, 0.0),
            target: Rect::square(screen / 2.0, 0.0),
            animation: None,
            tuning,
        };
        arena.resize(initial_size);
        arena
    }

    /// Snap to a square of `new_size` centered on the screen (no animation)
    pub fn resize(&mut self, new_size: f32) {
        let size = self.sanitize_size(new_size);
        let rect = Rect::square(self.screen / 2.0, size);
        self.current = rect;
        self.target = rect;
        self.animation = None;
    }

    /// Begin the eased collapse toward a small square around the current center.
    ///
    /// Calling this mid-animation restarts from wherever the arena is now.
    pub fn start_collapse_animation(&mut self) {
        let size = self.sanitize_size(self.tuning.collapse_size);
        let duration = if self.tuning.collapse_duration >= MIN_ANIMATION_DURATION {
            self.tuning.collapse_duration
        } else {
            log::warn!(
                "Collapse duration {} too small, clamping to {MIN_ANIMATION_DURATION}",
                self.tuning.collapse_duration
            );
            MIN_ANIMATION_DURATION
        };
        let start = self.current;
        let target = Rect::square(start.center(), size);
        self.target = target;
        self.animation = Some(ArenaAnimation {
            start,
            target,
            progress: 0.0,
            duration,
        });
    }

    /// Advance one frame: either the collapse animation or steady-state shrink
    pub fn update(&mut self, dt: f32) {
        if !(dt > 0.0) {
            return;
        }
        if self.animation.is_some() {
            self.advance_animation(dt);
            return;
        }
        self.shrink_targets(dt);
        self.catch_up(dt);
    }

    fn advance_animation(&mut self, dt: f32) {
        let Some(anim) = self.animation.as_mut() else {
            return;
        };
        anim.progress += dt / anim.duration;
        if anim.progress >= 1.0 {
            let target = anim.target;
            self.current = target;
            self.target = target;
            self.animation = None;
            log::debug!(
                "Arena collapse finished at {}x{}",
                target.width(),
                target.height()
            );
        } else {
            self.current = anim.start.lerp(&anim.target, ease_out_cubic(anim.progress));
        }
    }

    /// Drift target edges inward, never below the minimum size
    fn shrink_targets(&mut self, dt: f32) {
        let amount = self.tuning.shrink_rate.max(0.0) * dt;

        let slack_w = ((self.target.width() - self.tuning.min_width) / 2.0).max(0.0);
        let step_w = amount.min(slack_w);
        self.target.left += step_w;
        self.target.right -= step_w;

        let slack_h = ((self.target.height() - self.tuning.min_height) / 2.0).max(0.0);
        let step_h = amount.min(slack_h);
        self.target.top += step_h;
        self.target.bottom -= step_h;
    }

    /// Move current edges toward their targets at a capped speed
    fn catch_up(&mut self, dt: f32) {
        let max_step = self.tuning.catch_up_speed.max(0.0) * dt;
        self.current.left = move_towards(self.current.left, self.target.left, max_step);
        self.current.right = move_towards(self.current.right, self.target.right, max_step);
        self.current.top = move_towards(self.current.top, self.target.top, max_step);
        self.current.bottom = move_towards(self.current.bottom, self.target.bottom, max_step);
    }

    /// A player shot left through `edge`: push that edge's target outward.
    ///
    /// Returns whether the target moved. Ignored while animating, and an edge
    /// never expands past the wall buffer from the screen border.
    pub fn hit_wall(&mut self, edge: Edge) -> bool {
        if self.animation.is_some() {
            return false;
        }
        let buffer = self.tuning.wall_buffer;
        let expand = self.tuning.expand_amount.max(0.0);
        let target = &mut self.target;
        let (value, limit, outward) = match edge {
            Edge::Left => (&mut target.left, buffer, -1.0),
            Edge::Right => (&mut target.right, self.screen.x - buffer, 1.0),
            Edge::Top => (&mut target.top, buffer, -1.0),
            Edge::Bottom => (&mut target.bottom, self.screen.y - buffer, 1.0),
        };
        // Distance still available before the buffer, measured outward
        let room = (limit - *value) * outward;
        if room <= 0.0 {
            return false;
        }
        *value += outward * expand.min(room);
        true
    }

    /// View whose world region and screen viewport both match the arena
    pub fn clipping_view(&self) -> ClipView {
        let size = self.current.size();
        ClipView {
            center: self.current.center(),
            size,
            viewport_pos: self.current.position() / self.screen,
            viewport_size: size / self.screen,
        }
    }

    fn sanitize_size(&self, size: f32) -> f32 {
        let floor = self.tuning.min_width.max(self.tuning.min_height);
        if size.is_finite() && size >= floor {
            size
        } else {
            log::warn!("Arena size {size} below minimum, clamping to {floor}");
            floor
        }
    }

    pub fn left(&self) -> f32 {
        self.current.left
    }

    pub fn right(&self) -> f32 {
        self.current.right
    }

    pub fn top(&self) -> f32 {
        self.current.top
    }

    pub fn bottom(&self) -> f32 {
        self.current.bottom
    }

    pub fn width(&self) -> f32 {
        self.current.width()
    }

    pub fn height(&self) -> f32 {
        self.current.height()
    }

    pub fn position(&self) -> Vec2 {
        self.current.position()
    }

    pub fn size(&self) -> Vec2 {
        self.current.size()
    }

    /// Current (rendered, collided) rectangle
    pub fn rect(&self) -> Rect {
        self.current
    }

    /// Rectangle the current edges are chasing
    pub fn target_rect(&self) -> Rect {
        self.target
    }

    pub fn screen(&self) -> Vec2 {
        self.screen
    }

    pub fn animation(&self) -> Option<&ArenaAnimation> {
        self.animation.as_ref()
    }

    pub fn is_animation_complete(&self) -> bool {
        self.animation.is_none()
    }

    pub fn tuning(&self) -> &ArenaTuning {
        &self.tuning
    }
}

/// Step `current` toward `target` by at most `max_step`, snapping when close
#[inline]
fn move_towards(current: f32, target: f32, max_step: f32) -> f32 {
    let delta = target - current;
    if delta.abs() <= max_step {
        target
    } else {
        current + max_step * delta.signum()
    }
}

use bevy::prelude::*;

#[derive(Component)]
pub struct Fighter;

/// Identity of the controlling user. Owned by the profile store; the match
/// only references it.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub user_id: String,
    pub display_name: String,
}

/// Gameplay truth for one fighter: health and the damage gate.
///
/// `hurt` is the only damage entry point. It is a no-op while the fighter is
/// invulnerable or already dead, so airborne hazards and shots cannot change
/// an outcome that is already being resolved.
#[derive(Component, Debug, Clone)]
pub struct Combat {
    pub hp: i32,
    pub max_hp: i32,
    pub invulnerable: bool,
}

impl Combat {
    pub fn new(max_hp: i32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            invulnerable: false,
        }
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    /// Freeze the outcome: no further damage, health and position unchanged.
    #[inline]
    pub fn make_bulletproof(&mut self) {
        self.invulnerable = true;
    }

    pub fn hurt(&mut self, damage: i32, action: &mut ActionState, stun_secs: f32) {
        if self.invulnerable || self.is_dead() {
            return;
        }

        self.hp = (self.hp - damage).max(0);

        *action = if self.is_dead() {
            ActionState::Dead
        } else {
            ActionState::Hit(Timer::from_seconds(stun_secs, TimerMode::Once))
        };
    }
}

/// Fighter action state machine.
///
/// Locomotion states are re-derived every fixed tick from velocity and
/// ground contact; the timer-carrying states hold until their window
/// elapses. `Dead` is terminal.
#[derive(Component, Debug, Clone, Default)]
pub enum ActionState {
    #[default]
    Idle,
    Walk,
    Jump,
    ShootIdle(Timer),
    ShootWalk(Timer),
    Hit(Timer),
    Dead,
}

impl ActionState {
    /// Free to move, attack, or be re-derived from locomotion.
    #[inline]
    pub fn can_act(&self) -> bool {
        matches!(self, Self::Idle | Self::Walk | Self::Jump)
    }

    /// The shooting variant matching the current locomotion.
    pub fn shooting(&self, window_secs: f32) -> Self {
        let timer = Timer::from_seconds(window_secs, TimerMode::Once);
        match self {
            Self::Walk | Self::ShootWalk(_) => Self::ShootWalk(timer),
            _ => Self::ShootIdle(timer),
        }
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Number of active terrain contacts below the fighter.
#[derive(Component, Debug, Default)]
pub struct GroundContacts(pub u32);

impl GroundContacts {
    #[inline]
    pub fn grounded(&self) -> bool {
        self.0 > 0
    }
}

/// Physical key bindings for one fighter. The systems only ever see the
/// sampled [`FighterInput`], so two local players can use any two maps.
#[derive(Component, Debug, Clone, Copy)]
pub struct ControlMap {
    pub left: KeyCode,
    pub right: KeyCode,
    pub jump: KeyCode,
    pub attack: KeyCode,
}

impl ControlMap {
    /// Arrow keys + right shift.
    pub fn arrows() -> Self {
        Self {
            left: KeyCode::ArrowLeft,
            right: KeyCode::ArrowRight,
            jump: KeyCode::ArrowUp,
            attack: KeyCode::ShiftRight,
        }
    }

    /// AZERTY-style letters + space.
    pub fn letters() -> Self {
        Self {
            left: KeyCode::KeyQ,
            right: KeyCode::KeyD,
            jump: KeyCode::KeyS,
            attack: KeyCode::Space,
        }
    }
}

/// Per-fighter input signals sampled once per frame.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct FighterInput {
    pub move_axis: f32,
    pub jump: bool,
    pub attack: bool,
}

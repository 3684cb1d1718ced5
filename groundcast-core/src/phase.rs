//! Flight Phase Model and Deploy Classification
//!
//! ## Overview
//!
//! Telemetry lines carry the flight phase as free text. Real boards have
//! been observed emitting several spellings (`MAIN DEPLOY`, `MAIN_DEPLOY`,
//! firmware-specific variants), so the phase travels through the system in
//! two forms:
//!
//! - [`PhaseToken`]: the raw wire token, trimmed and upper-cased, stored
//!   inline without allocation. Unrecognized tokens pass through opaquely
//!   rather than being rejected at the decode boundary.
//! - [`FlightPhase`]: the closed enum used for state tracking, with a
//!   canonical ordering so a healthy flight is monotonic through
//!   `Ground → Rising → Coasting → MainDeploy → SecondDeploy → Landed`.
//!
//! ## Deploy detection
//!
//! Parachute deployment is detected by substring classification, not exact
//! enum matching: any token containing both `MAIN` and `DEPLOY` counts as a
//! main-deploy event, `SECOND` + `DEPLOY` as a second-deploy event. This is
//! intentionally tolerant of spelling drift across board firmwares. The
//! classification lives in one place - [`classify_deploy_event`] - so there
//! is exactly one answer to "which tokens trigger which flag".
//!
//! ## Display normalization
//!
//! Operator-facing views show both deploy phases as `DESCENT`; the raw
//! token is retained alongside so state tracking never loses information.
//! [`display_phase`] performs that mapping.

use core::fmt;

use crate::constants::MAX_PHASE_TOKEN;

/// Canonical flight phases
///
/// The discriminant order is the canonical flight ordering; see
/// [`FlightPhase::order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlightPhase {
    /// Board powered but not armed
    Idle,
    /// Armed on the pad
    Ground,
    /// Motor ignition
    Launch,
    /// Powered ascent
    Rising,
    /// Unpowered ascent after burnout
    Coasting,
    /// Main parachute deployment
    MainDeploy,
    /// Second (drogue/reserve) parachute deployment
    SecondDeploy,
    /// Generic descent, also the display form of both deploy phases
    Descent,
    /// On the ground after flight
    Landed,
}

impl FlightPhase {
    /// Position of this phase in the canonical flight ordering
    ///
    /// A nominal flight never regresses: each sample's phase order is
    /// greater than or equal to the previous one.
    pub const fn order(self) -> u8 {
        self as u8
    }

    /// Wire token for this phase
    ///
    /// Deploy phases use the space-separated spelling the data generator
    /// emits; [`FlightPhase::from_token`] accepts underscores as well.
    pub const fn as_token(self) -> &'static str {
        match self {
            FlightPhase::Idle => "IDLE",
            FlightPhase::Ground => "GROUND",
            FlightPhase::Launch => "LAUNCH",
            FlightPhase::Rising => "RISING",
            FlightPhase::Coasting => "COASTING",
            FlightPhase::MainDeploy => "MAIN DEPLOY",
            FlightPhase::SecondDeploy => "SECOND DEPLOY",
            FlightPhase::Descent => "DESCENT",
            FlightPhase::Landed => "LANDED",
        }
    }

    /// Parse a normalized (trimmed, upper-case) token into a known phase
    ///
    /// Returns `None` for tokens outside the closed set; callers that need
    /// deploy semantics for such tokens use [`classify_deploy_event`].
    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "IDLE" => FlightPhase::Idle,
            "GROUND" => FlightPhase::Ground,
            "LAUNCH" => FlightPhase::Launch,
            "RISING" => FlightPhase::Rising,
            "COASTING" => FlightPhase::Coasting,
            "MAIN DEPLOY" | "MAIN_DEPLOY" => FlightPhase::MainDeploy,
            "SECOND DEPLOY" | "SECOND_DEPLOY" => FlightPhase::SecondDeploy,
            "DESCENT" => FlightPhase::Descent,
            "LANDED" => FlightPhase::Landed,
            _ => return None,
        })
    }
}

impl fmt::Display for FlightPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

/// Parachute deployment event derived from a phase token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeployEvent {
    /// Main parachute out
    Main,
    /// Second parachute out
    Second,
}

/// Classify a normalized phase token as a deployment event
///
/// Substring-based by design: `MAIN` + `DEPLOY` anywhere in the token is a
/// main deploy, `SECOND` + `DEPLOY` a second deploy. When a token matches
/// both, main wins (mirrors the original if/elif evaluation order).
pub fn classify_deploy_event(token: &str) -> Option<DeployEvent> {
    let has_deploy = token.contains("DEPLOY");
    if has_deploy && token.contains("MAIN") {
        Some(DeployEvent::Main)
    } else if has_deploy && token.contains("SECOND") {
        Some(DeployEvent::Second)
    } else {
        None
    }
}

/// Inline phase token
///
/// Carries the raw wire phase through the system without allocation,
/// normalized (trimmed, ASCII upper-cased) at construction so substring
/// classification and display mapping can work on it directly.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhaseToken {
    len: u8,
    data: [u8; MAX_PHASE_TOKEN],
}

impl PhaseToken {
    /// Create from raw wire text; trims and upper-cases
    ///
    /// Returns `None` when the trimmed token exceeds the inline capacity.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let bytes = trimmed.as_bytes();
        if bytes.len() > MAX_PHASE_TOKEN {
            return None;
        }

        let mut data = [0u8; MAX_PHASE_TOKEN];
        for (dst, src) in data.iter_mut().zip(bytes) {
            *dst = src.to_ascii_uppercase();
        }

        Some(Self {
            len: bytes.len() as u8,
            data,
        })
    }

    /// Get the normalized token text
    pub fn as_str(&self) -> &str {
        // Only ASCII-uppercased UTF-8 is stored, so this cannot fail
        core::str::from_utf8(&self.data[..self.len as usize]).unwrap_or("")
    }

    /// Known phase this token maps to, if any
    pub fn phase(&self) -> Option<FlightPhase> {
        FlightPhase::from_token(self.as_str())
    }

    /// Deployment event this token signals, if any
    pub fn deploy_event(&self) -> Option<DeployEvent> {
        classify_deploy_event(self.as_str())
    }
}

impl From<FlightPhase> for PhaseToken {
    fn from(phase: FlightPhase) -> Self {
        // Canonical tokens all fit the inline capacity
        PhaseToken::new(phase.as_token()).unwrap_or(PhaseToken {
            len: 0,
            data: [0u8; MAX_PHASE_TOKEN],
        })
    }
}

impl fmt::Debug for PhaseToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl fmt::Display for PhaseToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a raw token to its operator-facing phase token
///
/// Both deploy phases display as `DESCENT`; everything else displays
/// unchanged, including tokens outside the closed phase set.
pub fn display_phase(raw: &PhaseToken) -> PhaseToken {
    match raw.deploy_event() {
        Some(_) => PhaseToken::from(FlightPhase::Descent),
        None => *raw,
    }
}

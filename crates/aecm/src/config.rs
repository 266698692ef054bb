//! Engine configuration: comfort noise and acoustic routing mode.

/// Comfort noise generation during far-end-only activity.
///
/// With CNG enabled the engine fills suppressed stretches with low-level
/// synthetic noise instead of hard silence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CngMode {
    Disabled = 0,
    #[default]
    Enabled = 1,
}

/// Acoustic echo-path assumption for the playback route.
///
/// Higher modes assume a louder, more reverberant path and suppress more
/// aggressively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoutingMode {
    QuietEarpieceOrHeadset = 0,
    Earpiece = 1,
    LoudEarpiece = 2,
    #[default]
    Speakerphone = 3,
    LoudSpeakerphone = 4,
}

impl RoutingMode {
    /// Suppression strength applied to the echo estimate, in Q15.
    pub(crate) fn suppression_q15(self) -> i32 {
        match self {
            Self::QuietEarpieceOrHeadset => 13_107, // 0.4
            Self::Earpiece => 19_661,               // 0.6
            Self::LoudEarpiece => 24_576,           // 0.75
            Self::Speakerphone => 29_491,           // 0.9
            Self::LoudSpeakerphone => 32_767,       // 1.0
        }
    }
}

/// Engine configuration, applied via
/// [`EchoControlMobile::set_config`](crate::EchoControlMobile::set_config).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AecmConfig {
    pub cng: CngMode,
    pub routing: RoutingMode,
}

impl TryFrom<i16> for CngMode {
    type Error = crate::Error;

    fn try_from(raw: i16) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::Disabled),
            1 => Ok(Self::Enabled),
            _ => Err(crate::Error::BadCngMode),
        }
    }
}

impl TryFrom<i16> for RoutingMode {
    type Error = crate::Error;

    fn try_from(raw: i16) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::QuietEarpieceOrHeadset),
            1 => Ok(Self::Earpiece),
            2 => Ok(Self::LoudEarpiece),
            3 => Ok(Self::Speakerphone),
            4 => Ok(Self::LoudSpeakerphone),
            _ => Err(crate::Error::BadEchoMode),
        }
    }
}

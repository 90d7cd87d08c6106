//! Packet type registry
//!
//! Frames carry the type as an opaque byte. This registry maps it to named
//! kinds for the application layer that dispatches on it.

use std::fmt;

/// Packet types understood by the flight controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum PacketType {
    /// Application/controller keep-alive
    Heartbeat = 0x01,

    /// Generic controller response
    Response = 0x11,

    /// Programmable flight action (payload: [`ProgramAction`](super::ProgramAction))
    ProgrammableTx = 0x22,
    /// Acknowledgment of a programmable action
    ProgrammableAck = 0x23,

    /// Peripheral self-check request
    DeviceCheckReq = 0x32,
    /// Peripheral self-check result
    DeviceCheckAck = 0x33,

    /// Emergency command (payload: [`ForceCommand`](super::ForceCommand))
    ForceCommand = 0x44,

    /// Firmware version and DSN query
    VersionRequest = 0x66,
    /// Firmware version and DSN reply
    VersionResponse = 0x67,

    /// Start a firmware upgrade
    UpgradeRequest = 0x80,
    /// Firmware image chunk
    UpgradeData = 0x81,
    /// Controller upgrade state report
    UpgradeAck = 0x82,

    /// Write device serial number
    DsnUpdate = 0xA0,
    /// ADC calibration command
    AdcCalibrate = 0xA1,
    /// ADC calibration result
    AdcCalibrateAck = 0xA2,
    /// ESC burn-in test
    EscBurnInTest = 0xA3,
    /// Accelerometer calibration command
    AccCalibrate = 0xA4,
    /// Accelerometer calibration result
    AccCalibrateAck = 0xA5,

    /// Calibration storage (MTD) access for repair
    MtdOperationRequest = 0xC0,
}

impl PacketType {
    /// Convert from byte
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Self::Heartbeat),
            0x11 => Some(Self::Response),
            0x22 => Some(Self::ProgrammableTx),
            0x23 => Some(Self::ProgrammableAck),
            0x32 => Some(Self::DeviceCheckReq),
            0x33 => Some(Self::DeviceCheckAck),
            0x44 => Some(Self::ForceCommand),
            0x66 => Some(Self::VersionRequest),
            0x67 => Some(Self::VersionResponse),
            0x80 => Some(Self::UpgradeRequest),
            0x81 => Some(Self::UpgradeData),
            0x82 => Some(Self::UpgradeAck),
            0xA0 => Some(Self::DsnUpdate),
            0xA1 => Some(Self::AdcCalibrate),
            0xA2 => Some(Self::AdcCalibrateAck),
            0xA3 => Some(Self::EscBurnInTest),
            0xA4 => Some(Self::AccCalibrate),
            0xA5 => Some(Self::AccCalibrateAck),
            0xC0 => Some(Self::MtdOperationRequest),
            _ => None,
        }
    }

    /// Convert to byte
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Check if this packet type is sent by the controller in reply to a request
    #[must_use]
    pub const fn is_ack(self) -> bool {
        matches!(
            self,
            Self::Response
                | Self::ProgrammableAck
                | Self::DeviceCheckAck
                | Self::VersionResponse
                | Self::UpgradeAck
                | Self::AdcCalibrateAck
                | Self::AccCalibrateAck
        )
    }

    /// Check if this packet type belongs to the factory test group
    #[must_use]
    pub const fn is_factory_test(self) -> bool {
        matches!(
            self,
            Self::DsnUpdate
                | Self::AdcCalibrate
                | Self::AdcCalibrateAck
                | Self::EscBurnInTest
                | Self::AccCalibrate
                | Self::AccCalibrateAck
        )
    }
}

impl TryFrom<u8> for PacketType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_u8(value).ok_or(value)
    }
}

impl From<PacketType> for u8 {
    fn from(value: PacketType) -> Self {
        value.as_u8()
    }
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Heartbeat => "Heartbeat",
            Self::Response => "Response",
            Self::ProgrammableTx => "ProgrammableTx",
            Self::ProgrammableAck => "ProgrammableAck",
            Self::DeviceCheckReq => "DeviceCheckReq",
            Self::DeviceCheckAck => "DeviceCheckAck",
            Self::ForceCommand => "ForceCommand",
            Self::VersionRequest => "VersionRequest",
            Self::VersionResponse => "VersionResponse",
            Self::UpgradeRequest => "UpgradeRequest",
            Self::UpgradeData => "UpgradeData",
            Self::UpgradeAck => "UpgradeAck",
            Self::DsnUpdate => "DsnUpdate",
            Self::AdcCalibrate => "AdcCalibrate",
            Self::AdcCalibrateAck => "AdcCalibrateAck",
            Self::EscBurnInTest => "EscBurnInTest",
            Self::AccCalibrate => "AccCalibrate",
            Self::AccCalibrateAck => "AccCalibrateAck",
            Self::MtdOperationRequest => "MtdOperationRequest",
        };
        write!(f, "{name}")
    }
}

//! Payload sub-codes carried by specific packet types

macro_rules! byte_code {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[repr(u8)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $value, )+
        }

        impl $name {
            /// Convert from byte
            #[must_use]
            pub fn from_u8(value: u8) -> Option<Self> {
                match value {
                    $( $value => Some(Self::$variant), )+
                    _ => None,
                }
            }

            /// Convert to byte
            #[must_use]
            pub const fn as_u8(self) -> u8 {
                self as u8
            }
        }
    };
}

byte_code! {
    /// Action carried by [`PacketType::ProgrammableTx`](super::PacketType::ProgrammableTx)
    pub enum ProgramAction {
        /// Hold position
        Hover = 0x00,
        /// Take off
        Takeoff = 0x01,
        /// Land
        Land = 0x02,
        /// Move forward
        Forward = 0x03,
        /// Move backward
        Backward = 0x04,
        /// Translate left
        TwLeft = 0x05,
        /// Translate right
        TwRight = 0x06,
        /// Climb
        Upward = 0x07,
        /// Descend
        Downward = 0x08,
        /// Yaw left
        RotateLeft = 0x09,
        /// Yaw right
        RotateRight = 0x0A,
    }
}

byte_code! {
    /// Peripheral addressed by a device check
    pub enum Device {
        /// Reserved
        Reserved = 0x0,
        /// Inertial measurement unit
        Imu = 0x1,
        /// Barometer
        Baro = 0x2,
        /// Time-of-flight range sensor
        Tof = 0x3,
        /// Optical flow sensor
        Flow = 0x4,
        /// Analog front end
        Adc = 0x5,
        /// Electronic speed controllers
        Esc = 0x6,
        /// Parameter flash
        Mtd = 0x7,
        /// Status LEDs
        Led = 0x8,
    }
}

byte_code! {
    /// Emergency command carried by [`PacketType::ForceCommand`](super::PacketType::ForceCommand)
    pub enum ForceCommand {
        /// Cut motor output immediately
        Cutoff = 0x01,
        /// Power the vehicle off
        Poweroff = 0x02,
        /// Land at the current position
        Land = 0x03,
    }
}

byte_code! {
    /// Firmware image kind in an upgrade request
    pub enum FirmwareType {
        /// No image
        None = 0x0,
        /// Flight controller image
        FlightController = 0x1,
    }
}

byte_code! {
    /// Controller state reported in [`PacketType::UpgradeAck`](super::PacketType::UpgradeAck)
    pub enum UpgradeState {
        /// Ready to accept an image
        Ready = 0x0,
        /// Erasing flash
        Erase = 0x1,
        /// Writing image data
        Upgrade = 0x2,
        /// Upgrade refused, see [`UpgradeRefusal`]
        Refused = 0x3,
        /// Jump to the new image failed
        JumpFailed = 0x4,
    }
}

byte_code! {
    /// Reason attached to [`UpgradeState::Refused`]
    pub enum UpgradeRefusal {
        /// Controller busy
        Busy = 0x0,
        /// Image older than the running firmware
        VersionOld = 0x1,
        /// Image exceeds flash size
        OverSize = 0x2,
        /// Unsupported request type
        TypeError = 0x3,
        /// Battery too low to flash safely
        LowVoltage = 0x4,
        /// Firmware type does not match the target
        FwTypeError = 0x5,
        /// Unspecified failure
        Unknown = 0x6,
        /// Not refused
        NoError = 0xF,
    }
}

byte_code! {
    /// Calibration storage operation for [`PacketType::MtdOperationRequest`](super::PacketType::MtdOperationRequest)
    pub enum MtdOperation {
        /// No operation
        None = 0x0,
        /// Read
        Read = 0x1,
        /// Write
        Write = 0x2,
        /// Erase
        Erase = 0x3,
    }
}

/// ADC calibration: high reference point
pub const ADC_CALIBRATE_H: u8 = 0x33;
/// ADC calibration: low reference point
pub const ADC_CALIBRATE_L: u8 = 0x44;
/// ADC calibration: voltage verification marker
pub const VOLT_VERIFY_DATA: u8 = 0xAA;
/// DSN update verification marker
pub const DSN_VERIFY_DATA: u8 = 0xBB;
/// DSN forced-overwrite verification marker
pub const DSN_FORCE_UPDATE_VERIFY: u8 = 0xBF;
/// ESC burn-in verification marker
pub const ESC_VERIFY_DATA: u8 = 0xCC;
/// Accelerometer calibration verification marker
pub const ACC_CALIBRATE_VERIFY: u8 = 0x5A;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_action_roundtrip() {
        for byte in 0x00..=0x0A {
            let action = ProgramAction::from_u8(byte).unwrap();
            assert_eq!(action.as_u8(), byte);
        }
        assert_eq!(ProgramAction::from_u8(0x0B), None);
    }

    #[test]
    fn test_refusal_gap() {
        assert_eq!(UpgradeRefusal::from_u8(0xF), Some(UpgradeRefusal::NoError));
        assert_eq!(UpgradeRefusal::from_u8(0x7), None);
    }

    #[test]
    fn test_force_command_has_no_zero() {
        assert_eq!(ForceCommand::from_u8(0), None);
        assert_eq!(ForceCommand::from_u8(3), Some(ForceCommand::Land));
    }

    #[test]
    fn test_device_and_mtd() {
        assert_eq!(Device::from_u8(0x6), Some(Device::Esc));
        assert_eq!(MtdOperation::Erase.as_u8(), 0x3);
        assert_eq!(FirmwareType::from_u8(1), Some(FirmwareType::FlightController));
        assert_eq!(UpgradeState::from_u8(4), Some(UpgradeState::JumpFailed));
    }
}

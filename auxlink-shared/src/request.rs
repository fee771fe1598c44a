//! Sideband request identifiers.

/// Request identifier carried in the first body byte of a message that
/// starts a transaction.
///
/// The top bit of that byte is the reply-type flag; the identifier is the
/// low seven bits.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestId {
    GetMessageTransactionVersion = 0x00,
    LinkAddress = 0x01,
    ConnectionStatusNotify = 0x02,
    EnumPathResources = 0x10,
    AllocatePayload = 0x11,
    QueryPayload = 0x12,
    ResourceStatusNotify = 0x13,
    ClearPayloadIdTable = 0x14,
    RemoteDpcdRead = 0x20,
    RemoteDpcdWrite = 0x21,
    RemoteI2cRead = 0x22,
    RemoteI2cWrite = 0x23,
    PowerUpPhy = 0x24,
    PowerDownPhy = 0x25,
    SinkEventNotify = 0x30,
    QueryStreamEncryptionStatus = 0x38,
}

impl RequestId {
    /// Convert from the first body byte. The reply-type bit is ignored.
    ///
    /// Returns `None` for unknown identifiers.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value & 0x7F {
            0x00 => Some(Self::GetMessageTransactionVersion),
            0x01 => Some(Self::LinkAddress),
            0x02 => Some(Self::ConnectionStatusNotify),
            0x10 => Some(Self::EnumPathResources),
            0x11 => Some(Self::AllocatePayload),
            0x12 => Some(Self::QueryPayload),
            0x13 => Some(Self::ResourceStatusNotify),
            0x14 => Some(Self::ClearPayloadIdTable),
            0x20 => Some(Self::RemoteDpcdRead),
            0x21 => Some(Self::RemoteDpcdWrite),
            0x22 => Some(Self::RemoteI2cRead),
            0x23 => Some(Self::RemoteI2cWrite),
            0x24 => Some(Self::PowerUpPhy),
            0x25 => Some(Self::PowerDownPhy),
            0x30 => Some(Self::SinkEventNotify),
            0x38 => Some(Self::QueryStreamEncryptionStatus),
            _ => None,
        }
    }

    /// Upper-case label used in trace lines.
    pub fn name(self) -> &'static str {
        match self {
            Self::GetMessageTransactionVersion => "GET_MESSAGE_TRANSACTION_VERSION",
            Self::LinkAddress => "LINK_ADDRESS",
            Self::ConnectionStatusNotify => "CONNECTION_STATUS_NOTIFY",
            Self::EnumPathResources => "ENUM_PATH_RESOURCES",
            Self::AllocatePayload => "ALLOCATE_PAYLOAD",
            Self::QueryPayload => "QUERY_PAYLOAD",
            Self::ResourceStatusNotify => "RESOURCE_STATUS_NOTIFY",
            Self::ClearPayloadIdTable => "CLEAR_PAYLOAD_ID_TABLE",
            Self::RemoteDpcdRead => "REMOTE_DPCD_READ",
            Self::RemoteDpcdWrite => "REMOTE_DPCD_WRITE",
            Self::RemoteI2cRead => "REMOTE_I2C_READ",
            Self::RemoteI2cWrite => "REMOTE_I2C_WRITE",
            Self::PowerUpPhy => "POWER_UP_PHY",
            Self::PowerDownPhy => "POWER_DOWN_PHY",
            Self::SinkEventNotify => "SINK_EVENT_NOTIFY",
            Self::QueryStreamEncryptionStatus => "QUERY_STREAM_ENCRYPTION_STATUS",
        }
    }

    /// Label for a raw body byte, `""` when the identifier is unknown.
    pub fn label_lossy(value: u8) -> &'static str {
        Self::from_u8(value).map(Self::name).unwrap_or("")
    }
}

impl TryFrom<u8> for RequestId {
    type Error = ();

    #[inline]
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_u8(value).ok_or(())
    }
}

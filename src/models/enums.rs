use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// The wire name (JSON and database) is the literal on the right.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(UserRole {
    Patient => "patient",
    Asha => "asha",
    Doctor => "doctor",
});

str_enum!(RecordType {
    Consultation => "consultation",
    Prescription => "prescription",
    TestResult => "test_result",
    Vitals => "vitals",
});

str_enum!(RequestStatus {
    Pending => "pending",
    Confirmed => "confirmed",
    Ready => "ready",
    Completed => "completed",
});

str_enum!(ConsultationStatus {
    Scheduled => "scheduled",
    Ongoing => "ongoing",
    Completed => "completed",
    Cancelled => "cancelled",
});

str_enum!(ConsultationType {
    Video => "video",
    Audio => "audio",
    Chat => "chat",
});

str_enum!(Severity {
    Low => "low",
    Medium => "medium",
    High => "high",
    Emergency => "emergency",
});

str_enum!(TriageSource {
    Ai => "ai",
    Offline => "offline",
});

str_enum!(AlertType {
    Medical => "medical",
    Accident => "accident",
});

str_enum!(AlertStatus {
    Active => "active",
    Responded => "responded",
    Resolved => "resolved",
});

str_enum!(VisitType {
    Routine => "routine",
    FollowUp => "follow_up",
    Emergency => "emergency",
});

impl UserRole {
    /// Roles that can respond to an emergency alert.
    pub fn is_responder(&self) -> bool {
        matches!(self, Self::Asha | Self::Doctor)
    }
}

impl Default for UserRole {
    fn default() -> Self {
        Self::Patient
    }
}

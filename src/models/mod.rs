//! Data models for Regdesk

pub mod badge;
pub mod claims;
pub mod enums;
pub mod registration;
pub mod session;

// Re-export commonly used types
pub use badge::{BadgeNumber, BadgeResponse, BadgeState, QrPayload};
pub use claims::{StaffClaims, StaffRole};
pub use enums::{AccommodationType, LocationType, ParticipationMode};
pub use registration::{Registration, RegistrationFilter, RegistrationQuery, RegistrationRow};
pub use session::SessionHandle;

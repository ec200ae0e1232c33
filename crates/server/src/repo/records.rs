//! `Record` impls for the stored resources.

use shared_types::{Case, Citizen, Dispute, Document, Lawyer, Reminder, Report};
use uuid::Uuid;

use super::Record;

/// Emails are unique case-insensitively.
pub fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

impl Record for Citizen {
    const KIND: &'static str = "citizen";

    fn id(&self) -> Uuid {
        self.id
    }

    fn unique_keys(&self) -> Vec<(&'static str, String)> {
        vec![("email", email_key(&self.email))]
    }
}

impl Record for Lawyer {
    const KIND: &'static str = "lawyer";

    fn id(&self) -> Uuid {
        self.id
    }

    fn unique_keys(&self) -> Vec<(&'static str, String)> {
        vec![
            ("email", email_key(&self.email)),
            ("license_number", self.license_number.trim().to_string()),
        ]
    }
}

macro_rules! plain_record {
    ($ty:ty, $kind:literal) => {
        impl Record for $ty {
            const KIND: &'static str = $kind;

            fn id(&self) -> Uuid {
                self.id
            }
        }
    };
}

plain_record!(Case, "case");
plain_record!(Dispute, "dispute");
plain_record!(Document, "document");
plain_record!(Reminder, "reminder");
plain_record!(Report, "report");

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlternativeContact {
    pub method: &'static str,
    pub value: &'static str,
    pub link: &'static str,
}

/// Shown next to every failed submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FallbackContactInfo {
    pub email: &'static str,
    pub message: &'static str,
    pub alternatives: Vec<AlternativeContact>,
}

/// WhatsApp chat with a prefilled, unnamed greeting.
pub const WHATSAPP_GREETING_LINK: &str =
    "https://wa.me/15551234567?text=Hello,%20I%20would%20like%20to%20get%20in%20touch%20with%20you.";

pub fn fallback_contact_info() -> FallbackContactInfo {
    FallbackContactInfo {
        email: "your-email@example.com",
        message: "Email service is temporarily unavailable. Please contact me directly using the information below:",
        alternatives: vec![
            AlternativeContact {
                method: "Email",
                value: "your-email@example.com",
                link: "mailto:your-email@example.com",
            },
            AlternativeContact {
                method: "WhatsApp",
                value: "+1 (555) 123-4567",
                link: WHATSAPP_GREETING_LINK,
            },
            AlternativeContact {
                method: "LinkedIn",
                value: "linkedin.com/in/yourprofile",
                link: "https://linkedin.com/in/yourprofile",
            },
            AlternativeContact {
                method: "GitHub",
                value: "github.com/yourusername",
                link: "https://github.com/yourusername",
            },
        ],
    }
}

/// Contact channel listed on the contact page.
#[derive(Debug, Clone, Serialize)]
pub struct ContactMethod {
    pub name: &'static str,
    pub label: &'static str,
    pub value: &'static str,
    pub link: &'static str,
    pub icon: &'static str,
    pub external: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub location: &'static str,
    pub timezone: &'static str,
    pub availability: &'static str,
    pub response_time: &'static str,
    pub languages: &'static [&'static str],
}

pub const CONTACT_METHODS: &[ContactMethod] = &[
    ContactMethod {
        name: "email",
        label: "Email",
        value: "your-email@example.com",
        link: "mailto:your-email@example.com",
        icon: "Mail",
        external: false,
    },
    ContactMethod {
        name: "whatsapp",
        label: "WhatsApp",
        value: "+1 (555) 123-4567",
        link: "https://wa.me/15551234567",
        icon: "MessageCircle",
        external: true,
    },
    ContactMethod {
        name: "linkedin",
        label: "LinkedIn",
        value: "linkedin.com/in/yourprofile",
        link: "https://linkedin.com/in/yourprofile",
        icon: "Linkedin",
        external: true,
    },
    ContactMethod {
        name: "github",
        label: "GitHub",
        value: "github.com/yourusername",
        link: "https://github.com/yourusername",
        icon: "Github",
        external: true,
    },
    ContactMethod {
        name: "twitter",
        label: "Twitter",
        value: "@yourhandle",
        link: "https://twitter.com/yourhandle",
        icon: "Twitter",
        external: true,
    },
];

pub const CONTACT_INFO: ContactInfo = ContactInfo {
    location: "Remote",
    timezone: "UTC",
    availability: "Available for new opportunities",
    response_time: "Usually responds within 24 hours",
    languages: &["English"],
};

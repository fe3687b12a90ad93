use abect_domain::calculator::Platform;
use abect_domain::constants::TOTAL_STEPS;
use std::fmt;

/// Wizard steps in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Step {
    ProjectType,
    Platform,
    PageCount,
    AddOns,
    Urgency,
    Contact,
}

impl Step {
    pub const ALL: [Self; TOTAL_STEPS] = [
        Self::ProjectType,
        Self::Platform,
        Self::PageCount,
        Self::AddOns,
        Self::Urgency,
        Self::Contact,
    ];

    pub const FIRST: Self = Self::ProjectType;
    pub const LAST: Self = Self::Contact;

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Maps an index to a step, clamping anything past the end to [`Step::LAST`].
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        if index >= TOTAL_STEPS { Self::LAST } else { Self::ALL[index] }
    }

    #[must_use]
    pub const fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    #[must_use]
    pub const fn prev(self) -> Self {
        Self::from_index(self.index().saturating_sub(1))
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProjectType => "project_type",
            Self::Platform => "platform",
            Self::PageCount => "page_count",
            Self::AddOns => "add_ons",
            Self::Urgency => "urgency",
            Self::Contact => "contact",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-text contact fields, checked only on the final step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contact {
    pub name: String,
    pub value: String,
    pub note: String,
}

impl Contact {
    /// Minimum number of characters in the trimmed name.
    pub const MIN_NAME_CHARS: usize = 2;

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.name.trim().chars().count() >= Self::MIN_NAME_CHARS && !self.value.trim().is_empty()
    }
}

/// Everything the visitor has chosen so far.
///
/// Slugs are references into the catalog. Add-ons keep insertion order and never repeat.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub step: Step,
    pub project_type: Option<String>,
    pub platform: Option<Platform>,
    pub page_count: u32,
    pub add_ons: Vec<String>,
    pub urgency: Option<String>,
    pub contact: Contact,
}

impl Selection {
    /// Fresh selection on the first step with the given page count.
    #[must_use]
    pub const fn new(page_count: u32) -> Self {
        Self {
            step: Step::FIRST,
            project_type: None,
            platform: None,
            page_count,
            add_ons: Vec::new(),
            urgency: None,
            contact: Contact { name: String::new(), value: String::new(), note: String::new() },
        }
    }

    #[must_use]
    pub fn has_add_on(&self, slug: &str) -> bool {
        self.add_ons.iter().any(|s| s == slug)
    }

    /// Whether the requirement of `step` is met.
    #[must_use]
    pub fn step_ready(&self, step: Step) -> bool {
        match step {
            Step::ProjectType => self.project_type.is_some(),
            Step::Platform => self.platform.is_some(),
            Step::PageCount => self.page_count > 0,
            Step::AddOns => true,
            Step::Urgency => self.urgency.is_some(),
            Step::Contact => self.contact.is_complete(),
        }
    }
}

//! Complaint status, priority and assignment-type enums.
//!
//! These must match the `CHECK` constraints on the `complaints` table in
//! `20260301000004_create_complaints_table.sql`.

define_text_enum! {
    /// Lifecycle status of a complaint.
    ComplaintStatus("complaint status") {
        /// Filed by a citizen, not yet triaged.
        Submitted => "submitted",
        /// Routed to a responsible unit.
        Assigned => "assigned",
        /// Work has started.
        InProgress => "in_progress",
        /// Work reported complete, awaiting supervisory approval.
        Resolved => "resolved",
        /// Work approved. Terminal.
        Closed => "closed",
        /// Complaint dismissed. Terminal.
        Rejected => "rejected",
    }
}

define_text_enum! {
    /// Urgency tier of a complaint.
    Priority("priority") {
        Low => "low",
        Medium => "medium",
        High => "high",
        Urgent => "urgent",
    }
}

define_text_enum! {
    /// Kind of jurisdiction unit currently responsible for a complaint.
    AssignmentType("assignment type") {
        Ward => "ward",
        Department => "department",
        GramPanchayat => "gram_panchayat",
        TalukPanchayat => "taluk_panchayat",
        ZillaPanchayat => "zilla_panchayat",
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl AssignmentType {
    /// Human-readable unit label used in routing messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Ward => "Ward",
            Self::Department => "Department",
            Self::GramPanchayat => "Gram Panchayat",
            Self::TalukPanchayat => "Taluk Panchayat",
            Self::ZillaPanchayat => "Zilla Panchayat",
        }
    }

    /// Whether this unit belongs to the three-tier panchayat hierarchy.
    pub fn is_panchayat_tier(self) -> bool {
        matches!(
            self,
            Self::GramPanchayat | Self::TalukPanchayat | Self::ZillaPanchayat
        )
    }
}

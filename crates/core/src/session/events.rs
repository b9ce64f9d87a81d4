//! # UI Events
//!
//! What the view layer can ask for, and what it gets back to display.

use crate::engine::ReserveOutcome;
use crate::error::SwapError;
use crate::state::{Item, ItemDraft, ItemId, Transaction};
use serde::{Deserialize, Serialize};

/// One user action from the view layer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum UiEvent {
    Search {
        #[serde(default)]
        query: Option<String>,
    },
    SuggestSimilar {
        item_id: ItemId,
    },
    Reserve {
        item_id: ItemId,
    },
    /// Listing from the "Add New Item" form; goes into the catalog
    SubmitNewItem {
        draft: ItemDraft,
    },
    /// Listing from the profile page; kept on the profile only
    AddProfileItem {
        draft: ItemDraft,
    },
    PayCard {
        #[serde(default)]
        card_number: String,
        #[serde(default)]
        expiry: String,
        #[serde(default)]
        cvv: String,
        #[serde(default)]
        name_on_card: String,
    },
    #[serde(rename = "paypal_pay")]
    PayPalPay {
        #[serde(default)]
        email: String,
        #[serde(default)]
        password: String,
    },
    PayWithCredits,
}

impl UiEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Search { .. } => "search",
            Self::SuggestSimilar { .. } => "suggest_similar",
            Self::Reserve { .. } => "reserve",
            Self::SubmitNewItem { .. } => "submit_new_item",
            Self::AddProfileItem { .. } => "add_profile_item",
            Self::PayCard { .. } => "pay_card",
            Self::PayPalPay { .. } => "paypal_pay",
            Self::PayWithCredits => "pay_with_credits",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// Message shown to the user after an event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Payload returned alongside the notice
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum EventData {
    Items(Vec<Item>),
    Suggestion { item_id: ItemId, text: String },
    Reservation(ReserveOutcome),
    Listing(Item),
    Payment(Transaction),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorInfo {
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventReply {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<EventData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
    #[serde(skip)]
    failure: Option<SwapError>,
}

impl EventReply {
    pub fn ok(notice: Option<Notice>, data: EventData) -> Self {
        Self {
            notice,
            data: Some(data),
            error: None,
            failure: None,
        }
    }

    pub fn failed(err: SwapError, notice: Notice) -> Self {
        Self {
            notice: Some(notice),
            data: None,
            error: Some(ErrorInfo {
                kind: err.kind().to_string(),
                message: err.to_string(),
            }),
            failure: Some(err),
        }
    }

    pub fn failure(&self) -> Option<&SwapError> {
        self.failure.as_ref()
    }

    pub fn is_ok(&self) -> bool {
        self.failure.is_none()
    }
}

//! Notification copy for library events

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A library event worth telling the member about
///
/// Serialized with a `type` tag; the serialized form is the opaque payload
/// handed to the notification API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notice {
    ReservationApproved {
        book_title: String,
    },
    ReservationRejected {
        book_title: String,
        reason: Option<String>,
    },
    ReservationAvailable {
        book_title: String,
    },
    BookIssued {
        book_title: String,
        due_date: NaiveDate,
    },
    BookReturned {
        book_title: String,
        fine: f64,
    },
    DueSoon {
        book_title: String,
        days_left: u32,
    },
    DueToday {
        book_title: String,
    },
    Overdue {
        book_title: String,
        days_overdue: u32,
        fine: f64,
    },
    Fine {
        book_title: String,
        amount: f64,
        reason: String,
    },
    NewArrival {
        book_title: String,
        author: String,
        category: String,
    },
}

/// Title and body shown to the member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedNotice {
    pub title: String,
    pub body: String,
}

impl Notice {
    /// Tag used in the payload's `type` field
    pub fn kind(&self) -> &'static str {
        match self {
            Notice::ReservationApproved { .. } => "reservation_approved",
            Notice::ReservationRejected { .. } => "reservation_rejected",
            Notice::ReservationAvailable { .. } => "reservation_available",
            Notice::BookIssued { .. } => "book_issued",
            Notice::BookReturned { .. } => "book_returned",
            Notice::DueSoon { .. } => "due_soon",
            Notice::DueToday { .. } => "due_today",
            Notice::Overdue { .. } => "overdue",
            Notice::Fine { .. } => "fine",
            Notice::NewArrival { .. } => "new_arrival",
        }
    }

    pub fn render(&self, currency: &str) -> RenderedNotice {
        let money = |amount: f64| format!("{}{:.2}", currency, amount);

        let (title, body) = match self {
            Notice::ReservationApproved { book_title } => (
                "Reservation Approved! 📚".to_string(),
                format!(
                    "Your reservation for \"{}\" has been approved and the book has been issued to you!",
                    book_title
                ),
            ),
            Notice::ReservationRejected { book_title, reason } => (
                "Reservation Rejected ❌".to_string(),
                format!(
                    "Your reservation for \"{}\" was rejected. {}",
                    book_title,
                    reason.as_deref().unwrap_or("")
                )
                .trim_end()
                .to_string(),
            ),
            Notice::ReservationAvailable { book_title } => (
                "Reservation Available".to_string(),
                format!(
                    "\"{}\" is now available for you to borrow. Please collect it within 48 hours.",
                    book_title
                ),
            ),
            Notice::BookIssued { book_title, due_date } => (
                "Book Issued".to_string(),
                format!(
                    "You have successfully issued \"{}\". Due date: {}",
                    book_title,
                    due_date.format("%a %b %d %Y")
                ),
            ),
            Notice::BookReturned { book_title, fine } if *fine > 0.0 => (
                "Book Returned".to_string(),
                format!("\"{}\" has been returned. Fine: {}", book_title, money(*fine)),
            ),
            Notice::BookReturned { book_title, .. } => (
                "Book Returned".to_string(),
                format!("\"{}\" has been successfully returned. Thank you!", book_title),
            ),
            Notice::DueSoon { book_title, days_left: 1 } => (
                "Book Due Tomorrow ⏰".to_string(),
                format!("\"{}\" is due tomorrow. Please return it to avoid fines.", book_title),
            ),
            Notice::DueSoon { book_title, days_left } => (
                format!("Book Due in {} Days ⏰", days_left),
                format!(
                    "\"{}\" is due in {} days. Please return it on time to avoid fines.",
                    book_title, days_left
                ),
            ),
            Notice::DueToday { book_title } => (
                "Book Due Today! ⚠️".to_string(),
                format!(
                    "\"{}\" is due today. Please return it to avoid overdue fines.",
                    book_title
                ),
            ),
            Notice::Overdue { book_title, days_overdue, fine } => (
                "Book Overdue! ⚠️".to_string(),
                format!(
                    "\"{}\" is {} day{} overdue. Fine: {}. Please return immediately.",
                    book_title,
                    days_overdue,
                    plural(*days_overdue),
                    money(*fine)
                ),
            ),
            Notice::Fine { book_title, amount, reason } => (
                "Outstanding Fine 💰".to_string(),
                format!(
                    "You have an outstanding fine of {} for \"{}\". {}",
                    money(*amount),
                    book_title,
                    reason
                )
                .trim_end()
                .to_string(),
            ),
            Notice::NewArrival { book_title, author, category } => (
                "New Book Arrival".to_string(),
                format!(
                    "New book in {}: \"{}\" by {} is now available.",
                    category, book_title, author
                ),
            ),
        };

        RenderedNotice { title, body }
    }

    /// Opaque payload attached to the notification
    pub fn payload(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

fn plural(n: u32) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

use shared_utils::{
    format_timestamp, format_timestamp_date, initial, or_placeholder, parse_timestamp, star_rating, truncate,
    TextTable, DASH,
};

use crate::models::{ContactMessage, Feedback};

const MESSAGE_WIDTH: usize = 48;

pub fn render_contacts(contacts: &[ContactMessage]) -> String {
    if contacts.is_empty() {
        return "No contact messages found".to_string();
    }

    let mut table = TextTable::new(["Id", "Name", "Email", "Phone", "Message", "Status", "Date"]);
    for contact in contacts {
        table.push_row([
            contact.id.clone(),
            or_placeholder(contact.name.as_deref(), DASH),
            or_placeholder(contact.email.as_deref(), DASH),
            or_placeholder(contact.phone_no.as_deref(), DASH),
            truncate(&or_placeholder(contact.message.as_deref(), DASH), MESSAGE_WIDTH),
            contact.status.to_string(),
            contact
                .created_at
                .as_ref()
                .and_then(parse_timestamp)
                .map(format_timestamp_date)
                .unwrap_or_else(|| DASH.to_string()),
        ]);
    }
    table.render()
}

pub fn render_feedbacks(feedbacks: &[Feedback]) -> String {
    if feedbacks.is_empty() {
        return "No feedbacks found".to_string();
    }

    feedbacks
        .iter()
        .map(render_feedback)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_feedback(feedback: &Feedback) -> String {
    let author = &feedback.user_data;
    let rating = feedback.rating.clamp(0.0, 5.0);
    let rating_text = if rating.fract() == 0.0 {
        format!("{}", rating as u8)
    } else {
        format!("{:.1}", rating)
    };

    format!(
        "({}) {} <{}>\n    Rating: {} ({}/5)\n    \"{}\"\n    {}",
        initial(author.name.as_deref()),
        or_placeholder(author.name.as_deref(), "Anonymous User"),
        or_placeholder(author.email.as_deref(), "No email provided"),
        star_rating(rating),
        rating_text,
        feedback.comment.as_deref().unwrap_or_default(),
        feedback
            .created_at
            .as_ref()
            .and_then(parse_timestamp)
            .map(format_timestamp)
            .unwrap_or_else(|| DASH.to_string()),
    )
}

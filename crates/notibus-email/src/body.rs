// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Email body construction from event metadata.
//!
//! Events carrying provider contact metadata render as a rich HTML job
//! card; everything else falls back to a plain templated body.

use notibus_core::{Metadata, NotificationEvent, metadata};

/// The rendered body of one outbound email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailBody {
    Html(String),
    Plain(String),
}

/// Build the body for `event`.
pub fn build_body(event: &NotificationEvent) -> EmailBody {
    let empty = Metadata::new();
    let meta = event.metadata.as_ref().unwrap_or(&empty);

    let provider_name = metadata::text(meta, "providerName");
    let provider_phone = metadata::text(meta, "providerPhone");
    let provider_email = metadata::text(meta, "providerEmail");

    let has_provider =
        !provider_name.is_empty() || !provider_phone.is_empty() || !provider_email.is_empty();
    if !has_provider {
        return EmailBody::Plain(plain_body(event));
    }

    let mut job_title = metadata::text(meta, "job_title");
    if job_title.is_empty() {
        job_title = metadata::text(meta, "jobTitle");
    }
    let wage = metadata::text(meta, "wage");
    let location = metadata::text(meta, "location");

    EmailBody::Html(format!(
        "<div style='font-family: sans-serif; max-width: 600px; border: 1px solid #eee; padding: 20px;'>\
         <h2 style='color: #007bff;'>New Job Match Found!</h2>\
         <p>Hello <b>{user}</b>, a new job matches your skills.</p>\
         <div style='background: #f8f9fa; border-left: 5px solid #007bff; padding: 15px; margin: 20px 0;'>\
         <h3 style='margin:0;'>{job_title}</h3>\
         <p style='margin:0;'><b>Offered Wage:</b> {wage}</p>\
         <p style='margin:0;'><b>Location:</b> {location}</p>\
         </div>\
         <h4 style='border-bottom: 1px solid #eee; padding-bottom: 10px;'>Contact the Provider</h4>\
         <p><b>Name:</b> {provider_name}</p>\
         <p><b>Phone:</b> {provider_phone}</p>\
         <p><b>Email:</b> {provider_email}</p>\
         <br><a href='#' style='display: inline-block; background: #28a745; color: white; padding: 12px 25px; text-decoration: none; border-radius: 5px;'>Accept Job</a>\
         <div style='margin-top:20px; padding:12px; background:#f1f1f1; border-top:1px solid #e0e0e0;'>\
         <strong>Contact {provider_name}</strong> at <a href='tel:{provider_phone}'>{provider_phone}</a> \
         or reply to <a href='mailto:{provider_email}'>{provider_email}</a>\
         </div>\
         </div>",
        user = event.user_name,
    ))
}

fn plain_body(event: &NotificationEvent) -> String {
    format!(
        "Hello {},\n\n{}\n\n-- {}\n",
        event.user_name, event.message, event.subject
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use notibus_core::{Destination, NotificationSource};
    use serde_json::json;

    fn event(metadata: Option<serde_json::Value>) -> NotificationEvent {
        NotificationEvent {
            user_name: "Asha".into(),
            username: "asha01".into(),
            subject: "New job match".into(),
            source: NotificationSource::Email,
            destination: Some(Destination {
                whatsapp_number: None,
                email: Some("asha@example.com".into()),
                user_id: None,
            }),
            message: "A painter role is available".into(),
            metadata: metadata.map(|m| m.as_object().unwrap().clone()),
        }
    }

    #[test]
    fn provider_metadata_renders_rich_html() {
        let event = event(Some(json!({
            "job_title": "Painter",
            "wage": "500rs/hour",
            "location": "Whitefield",
            "providerName": "Ravi",
            "providerPhone": "+911112223334",
            "providerEmail": "ravi@example.com"
        })));

        let EmailBody::Html(html) = build_body(&event) else {
            panic!("expected HTML body");
        };
        assert!(html.contains("New Job Match Found!"));
        assert!(html.contains("Painter"));
        assert!(html.contains("500rs/hour"));
        assert!(html.contains("Whitefield"));
        assert!(html.contains("mailto:ravi@example.com"));
        assert!(html.contains("Hello <b>Asha</b>"));
    }

    #[test]
    fn job_title_falls_back_to_camel_case_key() {
        let event = event(Some(json!({
            "jobTitle": "Plumber",
            "providerName": "Ravi"
        })));
        let EmailBody::Html(html) = build_body(&event) else {
            panic!("expected HTML body");
        };
        assert!(html.contains("Plumber"));
    }

    #[test]
    fn no_provider_metadata_renders_plain_body() {
        let event = event(Some(json!({"wage": "500rs/hour"})));
        let EmailBody::Plain(text) = build_body(&event) else {
            panic!("expected plain body");
        };
        assert!(text.contains("Hello Asha"));
        assert!(text.contains("A painter role is available"));
        assert!(text.contains("New job match"));
    }

    #[test]
    fn absent_metadata_renders_plain_body() {
        assert!(matches!(build_body(&event(None)), EmailBody::Plain(_)));
    }
}

// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound prompt texts for the job-posting conversation.

use notibus_core::JobCreateEvent;

pub const MAIN_MENU: &str = "\u{1F44B} Welcome! How can I help you?\n\n\
*1.* Post a Job\n\
*0.* Clear Memory / Reset\n\n\
_Reply with a number._";

pub const CONFIRMATION_PROMPT: &str = "\u{1F477} *Job Posting Service*\n\n\
Do you want to post a new job?\n\n\
*1.* Yes\n\
*2.* No\n\n\
_Reply with a number._";

pub const DETAILS_PROMPT: &str = "\u{2705} Great! Please describe the job details.\n\n\
Include:\n\
- Role (e.g., Painter)\n\
- Location\n\
- Wage/Salary\n\
- Description\n\n\
*Example:* \"Need a plumber in Whitefield, 500rs/hour to fix a leak.\"\n\n\
_Type your message below:_";

pub const DECLINE_ACK: &str = "\u{1F44C} No problem. Type *1* anytime to start again.";

pub const INVALID_OPTION: &str =
    "\u{274C} Invalid option. Please reply *1* for Yes or *2* for No.";

pub const TOO_SHORT: &str =
    "\u{26A0}\u{FE0F} That seems too short. Please provide more details about the job.";

pub const PROCESSING: &str = "\u{23F3} Processing details... please wait.";

pub const RESET_CONFIRMATION: &str = "\u{1F504} Memory cleared. Type *1* to start.";

pub const EXTRACTION_RETRY: &str =
    "\u{26A0}\u{FE0F} Sorry, I couldn't understand that. Please try describing the job again.";

/// Summary sent after a job has been extracted and published.
pub fn success_summary(job: &JobCreateEvent) -> String {
    format!(
        "\u{1F389} *Job Created Successfully!*\n\n\
         \u{1F477} **Role:** {}\n\
         \u{1F4CD} **Location:** {}\n\
         \u{1F4B0} **Wage:** {}\n\n\
         We are notifying available workers now. You will receive updates shortly.\n\n\
         _Type *1* to post another job._",
        job.job_title, job.location, job.wage
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_summary_includes_job_fields() {
        let job = JobCreateEvent {
            job_title: "Painter".into(),
            location: "Whitefield".into(),
            wage: "500rs/hour".into(),
            ..JobCreateEvent::default()
        };
        let summary = success_summary(&job);
        assert!(summary.contains("Painter"));
        assert!(summary.contains("Whitefield"));
        assert!(summary.contains("500rs/hour"));
    }
}

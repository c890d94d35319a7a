use crate::{
    config::ApplicantProfile,
    drafts::DraftMessage,
    entities::JobPosting,
    normalize::{description_to_html, escape_html},
};

/// Build the outreach draft for a posting. `None` when the posting has no
/// vendor email to send it to.
pub fn render_draft(
    posting: &JobPosting,
    profile: &ApplicantProfile,
    cc: Option<&str>,
) -> Option<DraftMessage> {
    let to = posting
        .vendor_email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())?;

    Some(DraftMessage {
        to: to.to_string(),
        cc: cc.map(str::to_string),
        subject: format!("Application – {}", posting.title),
        html_body: render_body(posting, profile),
    })
}

fn render_body(posting: &JobPosting, profile: &ApplicantProfile) -> String {
    let source_url = escape_html(&posting.source_url);
    let contact = [profile.email.as_str(), profile.phone.as_str()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .map(escape_html)
        .collect::<Vec<_>>()
        .join(" | ");

    format!(
        r#"<p>Hello,</p>
<p>I hope you are doing well.</p>
<p>I recently came across your posting for a <b>{role}</b> role and wanted to share my resume for your consideration.</p>
<p><b>Visa:</b> {visa}<br>
<b>Location:</b> {location}</p>
<p>Please let me know if you need any additional information. I look forward to hearing from you.</p>
<p>Regards,<br>
{name}<br>
{contact}</p>
<hr>
<p><b>Job Posting Link:</b><br>
<a href="{source_url}" target="_blank">{source_url}</a></p>
<p><b>Job Description:</b></p>
<p style="font-size:12px; color:#333;">{description}</p>
"#,
        role = escape_html(&profile.target_role),
        visa = escape_html(&profile.visa),
        location = escape_html(&profile.location),
        name = escape_html(&profile.name),
        contact = contact,
        source_url = source_url,
        description = description_to_html(&posting.description_text),
    )
}

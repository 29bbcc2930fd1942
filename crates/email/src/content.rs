//! Shared email content templates
//!
//! Canonical content generators for invitation emails, used by both
//! production (SES) and mock email services.

/// Subject line for invitation emails
pub const INVITATION_SUBJECT: &str = "You're invited to join Roster";

fn invitation_lead(inviter: Option<&str>) -> String {
    match inviter {
        Some(inviter) => format!("{} has invited you to join their team on Roster.", inviter),
        None => "You have been invited to join a team on Roster.".to_string(),
    }
}

/// Generate plain-text body for an invitation email.
pub fn invitation_text(inviter: Option<&str>, action_link: &str) -> String {
    format!(
        "Hi there!\n\n\
        {}\n\n\
        Follow the link below to register and accept the invitation:\n\
        {}\n\n\
        Thanks,\n\
        The Roster Team",
        invitation_lead(inviter),
        action_link
    )
}

/// Generate styled HTML body for an invitation email.
pub fn invitation_html(inviter: Option<&str>, action_link: &str) -> String {
    format!(
        r#"
            <html>
            <body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
                <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
                    <h2 style="color: #2f6f4e;">You're invited!</h2>

                    <p>Hi there!</p>

                    <p>{lead}</p>

                    <div style="text-align: center; margin: 30px 0;">
                        <a href="{action_link}"
                           style="background-color: #2f6f4e; color: white; padding: 12px 24px; text-decoration: none; border-radius: 4px; display: inline-block; font-weight: bold;">
                            Register now
                        </a>
                    </div>

                    <p>Or copy and paste this link in your browser:</p>
                    <p style="background-color: #f5f5f5; padding: 10px; border-radius: 4px; word-break: break-all;">
                        <a href="{action_link}">{action_link}</a>
                    </p>

                    <hr style="border: none; border-top: 1px solid #eee; margin: 30px 0;">

                    <p style="color: #666; font-size: 12px;">Thanks, The Roster Team</p>
                </div>
            </body>
            </html>
            "#,
        lead = invitation_lead(inviter),
        action_link = action_link
    )
}

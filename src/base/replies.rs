//! Fixed texts the bot sends back to users.

/// Reply sent to any plain message addressed to the bot.
pub const AUTO_REPLY_TEXT: &str = "Hi! I'm the notification bot. I only deliver announcements, so I can't answer messages here.";

/// Reply sent when a reaction could not be recorded against its notification.
pub fn reaction_failed(err: &anyhow::Error) -> String {
    format!("Sorry, I couldn't record your reaction: {err}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reaction_failed_embeds_the_error() {
        let text = reaction_failed(&anyhow::anyhow!("storage is down"));

        assert!(text.starts_with("Sorry"));
        assert!(text.ends_with("storage is down"));
    }
}

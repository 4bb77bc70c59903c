//! Plain-text rendering of feeds for console-style clients.

use crate::service::VideoView;

const SEPARATOR: &str = "-------------------";

/// Render `feed` for the user named `owner_name`.
pub fn render_feed(owner_name: &str, feed: &[VideoView]) -> String {
    if feed.is_empty() {
        return "Your feed is empty.\n".to_string();
    }

    let mut out = format!("Feed for {}:\n", owner_name);
    for video in feed {
        out.push_str(&render_video(video));
    }
    out
}

/// Render a single video block, ending with a separator line
pub fn render_video(video: &VideoView) -> String {
    let mut out = format!(
        "ID: {} - Title: {} - Owner: {}\nReactions: {}\nComments:\n",
        video.id,
        video.title,
        video.owner_name,
        render_reactions(video)
    );
    if video.comments.is_empty() {
        out.push_str("No comments\n");
    } else {
        for comment in &video.comments {
            out.push_str(&format!("- {}\n", comment));
        }
    }

    out.push_str(SEPARATOR);
    out.push('\n');
    out
}

fn render_reactions(video: &VideoView) -> String {
    if video.reactions.is_empty() {
        return "None".to_string();
    }
    video
        .reactions
        .iter()
        .map(|(kind, count)| format!("{}({})", kind, count))
        .collect::<Vec<_>>()
        .join(" ")
}

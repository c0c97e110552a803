//! Prompt sent to the AI for a ticket availability verdict.

use crate::domain::{MARKER_NO_INFO, MARKER_NO_TICKETS, MARKER_TICKETS_AVAILABLE, WatchTarget};

/// Build the analysis prompt for `target` around the extracted page text.
pub fn ticket_prompt(target: &WatchTarget, page_text: &str) -> String {
    let site = &target.site_name;
    let event = &target.event_name;
    format!(
        "Please analyze this content from the {site} website and determine if there are tickets \
available for ordinary people (not season ticket holders or members) for the {event} match.

Look for:
1. Any mentions of \"{event}\" matches
2. Ticket availability information
3. General sale information (not just for members/season ticket holders)
4. Any indication that tickets are on sale to the public

Website content:
{page_text}

Respond with either:
- \"{MARKER_TICKETS_AVAILABLE}\" if there are tickets available for ordinary people for the {event} match
- \"{MARKER_NO_TICKETS}\" if no tickets are available or only for members/season ticket holders
- \"{MARKER_NO_INFO}\" if there's no clear information about {event} match tickets

Also provide a brief explanation of what you found."
    )
}

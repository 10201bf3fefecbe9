/// Marker Bamboo puts in front of the parent build a dependent build was triggered by.
const CHILD_OF_MARKER: &str = "Child of";

/// Reference to the build that triggered a dependent build.
///
/// Bamboo renders the reason of a child build as HTML, e.g.
/// `Child of <a href="/browse/PRJ-PARENT-99">PRJ-PARENT-99</a>`. Other reasons
/// such as `Changes by <a href="...">Jane Doe</a>` also carry anchors but do
/// not point at a parent build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReasonLink {
    /// Full key of the parent build (plan key plus build number)
    pub parent_build_key: String,
}

impl BuildReasonLink {
    /// Extracts the parent build from a build reason, if the reason names one.
    pub fn parse(reason: &str) -> Option<Self> {
        let start = reason.find(CHILD_OF_MARKER)?;
        let rest = &reason[start + CHILD_OF_MARKER.len()..];

        let key = anchor_text(rest)?.trim();
        if key.is_empty() {
            return None;
        }

        Some(Self {
            parent_build_key: key.to_string(),
        })
    }
}

/// Text content of the first `<a ...>...</a>` element in `text`.
fn anchor_text(text: &str) -> Option<&str> {
    let open = find_anchor_open(text)?;
    let after_open = &text[open..];
    let content_start = open + after_open.find('>')? + 1;

    let content = &text[content_start..];
    let close = content.find("</a>")?;

    Some(&content[..close])
}

/// Byte index of the first `<a>` or `<a ` tag opening (not `<abbr>` etc.).
fn find_anchor_open(text: &str) -> Option<usize> {
    text.match_indices("<a").find_map(|(index, tag)| {
        match text[index + tag.len()..].chars().next() {
            Some('>') | Some(' ') | Some('\t') | Some('\n') => Some(index),
            _ => None,
        }
    })
}

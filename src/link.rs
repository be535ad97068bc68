/// GitHub blob URLs with `#L{n}` / `#L{start}-L{end}` anchors.
use crate::repo::Location;
use crate::types::LineAnchor;

/// Build `https://<host>/<owner>/<name>/blob/<revision>/<path>` plus the anchor fragment.
pub fn format_link(host: &str, location: &Location, anchor: LineAnchor) -> String {
    let Location {
        identity,
        path,
        revision,
    } = location;
    return format!(
        "https://{host}/{}/blob/{}/{}{anchor}",
        identity.0, revision.0, path.0
    );
}

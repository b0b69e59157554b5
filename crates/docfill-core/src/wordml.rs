//! Small helpers over `roxmltree` for WordprocessingML elements.

use roxmltree::Node;

/// WordprocessingML main namespace (`w:` prefix).
pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// True when `node` is the `w:<name>` element.
pub fn is_w(node: &Node, name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == name
        && node.tag_name().namespace() == Some(W_NS)
}

/// `w:val` of a `w:tag` element.
pub fn tag_value<'a>(node: &Node<'a, '_>) -> Option<&'a str> {
    node.attribute((W_NS, "val"))
}

/// Structured content controls (`w:sdt`) in document order.
pub fn content_controls<'a, 'input>(
    doc: &'a roxmltree::Document<'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    doc.descendants().filter(|n| is_w(n, "sdt"))
}

/// First `w:tag` below a content control, if any.
pub fn first_tag<'a, 'input>(sdt: &Node<'a, 'input>) -> Option<Node<'a, 'input>> {
    sdt.descendants().find(|n| is_w(n, "tag"))
}

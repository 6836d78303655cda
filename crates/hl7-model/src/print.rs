//! Text rendering of a materialised structure tree.

use crate::group::Group;
use crate::segment::Segment;
use crate::structure::Structure;

const INDENT: &str = "  ";

pub(crate) fn render_group(group: &Group, label: &str, depth: usize, lines: &mut Vec<String>) {
    let indent = INDENT.repeat(depth);
    lines.push(format!("{indent}{label} (start)"));
    for item in group.items() {
        for (rep, instance) in item.instances().iter().enumerate() {
            let label = if rep == 0 {
                item.name().to_string()
            } else {
                format!("{}[{rep}]", item.name())
            };
            match instance {
                Structure::Group(child) => render_group(&child.borrow(), &label, depth + 1, lines),
                Structure::Segment(child) => {
                    lines.push(render_segment(&child.borrow(), &label, depth + 1));
                }
            }
        }
    }
    lines.push(format!("{indent}{label} (end)"));
}

fn render_segment(segment: &Segment, label: &str, depth: usize) -> String {
    format!(
        "{}{label} ({}/{} fields populated)",
        INDENT.repeat(depth),
        segment.populated_fields(),
        segment.num_fields()
    )
}

//! Graphviz DOT serialization for the feat graph.

use std::io::{self, Write};

use crate::domain::{FeatGraph, Shape};

/// Graph-wide attributes written into the DOT source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attributes {
    /// The title drawn under the graph.
    pub label: String,
    /// Layout direction, such as `LR`.
    pub rankdir: String,
    /// Font size of node labels.
    pub font_size: u32,
}

/// Writes `graph` as a strict Graphviz digraph.
///
/// Nodes are identified by their quoted label, so the output can be laid out
/// as-is by any Graphviz engine.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn write_dot<W: Write>(graph: &FeatGraph, attributes: &Attributes, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "strict digraph {{")?;
    writeln!(
        writer,
        "\tgraph [label={}, rankdir={}];",
        quote(&attributes.label),
        quote(&attributes.rankdir)
    )?;
    writeln!(writer, "\tnode [fontsize={}];", attributes.font_size)?;

    for node in graph.nodes() {
        match node.shape {
            Shape::Rectangle => writeln!(writer, "\t{} [shape=rectangle];", quote(&node.label))?,
            Shape::Default => writeln!(writer, "\t{};", quote(&node.label))?,
        }
    }

    for (source, target) in graph.edges() {
        writeln!(writer, "\t{} -> {};", quote(source), quote(target))?;
    }

    writeln!(writer, "}}")
}

/// Renders `graph` to a DOT string.
///
/// # Panics
///
/// Never in practice: writing to an in-memory buffer cannot fail, and the
/// output is built from UTF-8 strings.
#[must_use]
pub fn to_dot(graph: &FeatGraph, attributes: &Attributes) -> String {
    let mut bytes = Vec::new();
    write_dot(graph, attributes, &mut bytes).expect("writing to a Vec cannot fail");
    String::from_utf8(bytes).expect("DOT output is built from strings")
}

/// Quotes a string as a DOT identifier.
///
/// Newlines become `\n`, which Graphviz draws as a centred line break.
fn quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => {}
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::domain::{Dependency, Feat};

    fn attributes() -> Attributes {
        Attributes {
            label: "Feats\nversion 3".to_string(),
            rankdir: "LR".to_string(),
            font_size: 10,
        }
    }

    #[test_case("Dodge", r#""Dodge""#; "plain")]
    #[test_case("Weapon Focus: Slashing Weapons", r#""Weapon Focus: Slashing Weapons""#; "colon")]
    #[test_case("One of:\nA\n", r#""One of:\nA\n""#; "newlines")]
    #[test_case(r#"The "Best""#, r#""The \"Best\"""#; "quotes")]
    #[test_case(r"a\b", r#""a\\b""#; "backslash")]
    fn quoting(input: &str, expected: &str) {
        assert_eq!(quote(input), expected);
    }

    #[test]
    fn empty_graph() {
        let dot = to_dot(&FeatGraph::default(), &attributes());
        assert_eq!(
            dot,
            "strict digraph {\n\
             \tgraph [label=\"Feats\\nversion 3\", rankdir=\"LR\"];\n\
             \tnode [fontsize=10];\n\
             }\n"
        );
    }

    #[test]
    fn nodes_and_edges() {
        let feats = [Feat {
            name: "Trapmaking".to_string(),
            required_deps: vec![Dependency::new("BAB", "1")],
            alternative_deps: vec![Dependency::new("Feat", "Nimble Fingers")],
            ..Feat::default()
        }];
        let graph = FeatGraph::build(&feats);

        let dot = to_dot(&graph, &attributes());

        assert!(dot.contains("\t\"Trapmaking\" [shape=rectangle];\n"));
        assert!(dot.contains("\t\"BAB1\";\n"));
        assert!(dot.contains("\t\"One of:\\nNimble Fingers\\n\" [shape=rectangle];\n"));
        assert!(dot.contains("\t\"BAB1\" -> \"Trapmaking\";\n"));
        assert!(dot.contains("\t\"One of:\\nNimble Fingers\\n\" -> \"Trapmaking\";\n"));
        assert!(dot.ends_with("}\n"));
    }
}

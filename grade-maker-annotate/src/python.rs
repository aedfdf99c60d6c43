//! Python syntax-tree helpers built on tree-sitter.

use std::cell::RefCell;

use tree_sitter::{Node, Parser, Tree};

thread_local! {
    // Tree-sitter parsers are expensive to create, one per thread is enough.
    static PYTHON_PARSER: RefCell<Parser> = RefCell::new({
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .expect("invalid Python grammar");
        parser
    });
}

fn parse(content: &str) -> Option<Tree> {
    PYTHON_PARSER.with(|parser| parser.borrow_mut().parse(content, None))
}

/// Where a function lives inside a source file. All lines are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionSite {
    /// Line of the `def` keyword. Decorators live above this line.
    pub header_line: usize,
    /// Line where the first statement of the body starts.
    pub body_line: usize,
    /// Line right after the docstring, when the body starts with one.
    pub after_docstring_line: Option<usize>,
}

impl FunctionSite {
    /// The line the feedback must be inserted at: right after the docstring if
    /// present, otherwise right after the line ending the function header.
    ///
    /// Inserting at the returned index of the file's line list pushes the rest
    /// of the body down, keeping the inserted lines between the header (or
    /// docstring) and the first real statement.
    pub fn insertion_line(&self) -> usize {
        if let Some(line) = self.after_docstring_line {
            return line;
        }
        if self.body_line > self.header_line {
            self.body_line
        } else {
            // one-liner (`def f(): return 1`), insert after the whole def
            self.header_line + 1
        }
    }
}

/// Locate the first function or method named `target`, in document order.
///
/// The whole tree is searched, so methods inside classes and nested functions
/// are found as well. Returns `None` if no function with that name exists.
pub fn find_function(content: &str, target: &str) -> Option<FunctionSite> {
    let tree = parse(content)?;
    find_in_node(tree.root_node(), content.as_bytes(), target)
}

/// Whether the content fails to parse as Python.
pub fn has_syntax_errors(content: &str) -> bool {
    match parse(content) {
        Some(tree) => tree.root_node().has_error(),
        None => true,
    }
}

fn find_in_node(node: Node, source: &[u8], target: &str) -> Option<FunctionSite> {
    if node.kind() == "function_definition" && function_name(node, source) == Some(target) {
        if let Some(site) = site_of(node) {
            return Some(site);
        }
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(site) = find_in_node(child, source, target) {
            return Some(site);
        }
    }
    None
}

fn function_name<'a>(node: Node, source: &'a [u8]) -> Option<&'a str> {
    node.child_by_field_name("name")?.utf8_text(source).ok()
}

fn site_of(node: Node) -> Option<FunctionSite> {
    let body = node.child_by_field_name("body")?;
    let first_statement = body.named_child(0)?;
    Some(FunctionSite {
        header_line: node.start_position().row,
        body_line: first_statement.start_position().row,
        after_docstring_line: docstring_end(first_statement),
    })
}

/// The line right after the docstring, if `statement` is one.
fn docstring_end(statement: Node) -> Option<usize> {
    if statement.kind() != "expression_statement" {
        return None;
    }
    let inner = statement.named_child(0)?;
    if inner.kind() != "string" {
        return None;
    }
    Some(statement.end_position().row + 1)
}

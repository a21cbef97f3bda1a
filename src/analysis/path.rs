use std::fmt::Write;

/// One step from a container to a child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Key(&'a str),
    Index(usize),
}

/// Path from the root to the node currently being visited.
///
/// Its length is the depth of that node. Rendering is deferred until a
/// record or an error actually needs the text.
#[derive(Debug, Default)]
pub struct PathStack<'a> {
    segments: Vec<Segment<'a>>,
}

impl<'a> PathStack<'a> {
    pub fn new() -> Self { Self::default() }

    pub fn depth(&self) -> usize { self.segments.len() }

    pub fn push(&mut self, segment: Segment<'a>) { self.segments.push(segment); }

    pub fn pop(&mut self) { self.segments.pop(); }

    /// `root`, then `.key` per object field and `[i]` per array element.
    pub fn render(&self) -> String {
        let mut out = String::from("root");
        for seg in &self.segments { write_segment(&mut out, *seg); }
        out
    }

    /// Render with one extra trailing segment, without mutating the stack.
    pub fn render_with(&self, last: Segment<'_>) -> String {
        let mut out = self.render();
        write_segment(&mut out, last);
        out
    }
}

fn write_segment(out: &mut String, seg: Segment<'_>) {
    match seg {
        Segment::Key(k) => { out.push('.'); out.push_str(k); }
        Segment::Index(i) => { let _ = write!(out, "[{i}]"); }
    }
}

/// Output buffer and indentation state for source generation
pub(crate) struct CompilerContext {
    buffer: String,
    depth: usize,
    indent: String,
}

impl CompilerContext {
    /// `indent` is the text repeated once per nesting level
    pub(crate) fn new(indent: impl Into<String>) -> Self {
        Self {
            buffer: String::new(),
            depth: 0,
            indent: indent.into(),
        }
    }

    pub(crate) fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    pub(crate) fn add_line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.buffer.push_str(&self.indent);
        }
        self.buffer.push_str(text);
        self.buffer.push('\n');
    }

    pub(crate) fn indent(&mut self) {
        self.depth += 1;
    }

    pub(crate) fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    pub(crate) fn get_output(self) -> String {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_lines_are_indented() {
        let mut ctx = CompilerContext::new("  ");
        ctx.add_line("a(");
        ctx.indent();
        ctx.add_line("b");
        ctx.dedent();
        ctx.dedent();
        ctx.add_line(");");
        ctx.add("\n");

        assert_eq!(ctx.get_output(), "a(\n  b\n);\n\n");
    }
}

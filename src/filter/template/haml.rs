//! Indentation-based markup compiled to Handlebars source.
//!
//! A small Haml dialect. Each non-blank line is one construct:
//!
//! | Line                         | Output                               |
//! |------------------------------|--------------------------------------|
//! | `!!!`                        | `<!DOCTYPE html>`                    |
//! | `%p.lead#intro(lang="en")`   | `<p class="lead" id="intro" lang="en">` |
//! | `.box` / `#main`             | `<div class="box">` / `<div id="main">` |
//! | `%p Hello #{name}`           | `<p>Hello {{name}}</p>`              |
//! | `%p= title` / `%p!= html`    | `<p>{{title}}</p>` / `<p>{{{html}}}</p>` |
//! | `= expr` / `!= expr`         | `{{expr}}` / `{{{expr}}}`            |
//! | `- if x` … `- else` …        | `{{#if x}}` … `{{else}}` … `{{/if}}` |
//! | `/ note`                     | `<!-- note -->`                      |
//! | `-# note`                    | nothing (nested lines dropped too)   |
//! | `\%literal`                  | `%literal`                           |
//!
//! Nesting is expressed by indentation with spaces. The unit is taken from
//! the first indented line; every line sits at most one level below its
//! parent. Output is indented two spaces per level.

use rustc_hash::FxHashSet;

use super::{CompileError, Compiler};

/// Elements rendered without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Block helpers reachable through `- keyword arg`.
const BLOCK_KEYWORDS: &[&str] = &["if", "unless", "each", "with"];

/// Compiles the markup dialect into Handlebars template source.
#[derive(Debug, Clone)]
pub struct HamlCompiler {
    void_elements: FxHashSet<&'static str>,
}

impl Default for HamlCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl HamlCompiler {
    pub fn new() -> Self {
        Self {
            void_elements: VOID_ELEMENTS.iter().copied().collect(),
        }
    }
}

impl Compiler for HamlCompiler {
    fn compile(&mut self, source: &str) -> Result<String, CompileError> {
        let lines = split_lines(source)?;
        let out = Emitter::new(&self.void_elements).run(&lines)?;

        // The emitter only produces well-formed helpers, but user expressions
        // end up verbatim inside mustaches
        handlebars::Template::compile(&out).map_err(|e| CompileError::Template(Box::new(e)))?;
        Ok(out)
    }
}

// ============================================================================
// Lines
// ============================================================================

#[derive(Debug)]
struct Line<'a> {
    /// 1-based line number in the source
    number: usize,
    level: usize,
    text: &'a str,
}

/// Split source into non-blank lines with their nesting level.
///
/// Lines nested under a `-#` comment are dropped here, unchecked.
fn split_lines(source: &str) -> Result<Vec<Line<'_>>, CompileError> {
    let mut unit = None;
    let mut lines = Vec::new();
    // Indent width of an active `-#` comment
    let mut silent: Option<usize> = None;

    for (idx, raw) in source.lines().enumerate() {
        let number = idx + 1;
        let text = raw.trim_end();
        if text.trim_start().is_empty() {
            continue;
        }

        let body = text.trim_start();
        let indent = &text[..text.len() - body.len()];
        if let Some(width) = silent {
            if indent.len() > width {
                continue;
            }
            silent = None;
        }
        if indent.contains('\t') {
            return Err(CompileError::syntax(number, "tabs are not allowed in indentation"));
        }
        if indent.len() != indent.chars().count() || indent.chars().any(|c| c != ' ') {
            return Err(CompileError::syntax(number, "indentation must use spaces"));
        }

        let width = indent.len();
        let level = if width == 0 {
            0
        } else {
            let unit = *unit.get_or_insert(width);
            if width % unit != 0 {
                return Err(CompileError::syntax(
                    number,
                    format!("inconsistent indentation: {width} spaces is not a multiple of {unit}"),
                ));
            }
            width / unit
        };

        if body.starts_with("-#") {
            silent = Some(width);
        }
        lines.push(Line {
            number,
            level,
            text: body,
        });
    }

    Ok(lines)
}

// ============================================================================
// Emitter
// ============================================================================

/// A construct waiting for its closing output.
#[derive(Debug)]
enum Open {
    Tag { level: usize, name: String },
    Block { level: usize, keyword: String, has_else: bool },
    Comment { level: usize },
}

impl Open {
    fn level(&self) -> usize {
        match self {
            Self::Tag { level, .. } | Self::Block { level, .. } | Self::Comment { level } => *level,
        }
    }
}

struct Emitter<'v> {
    void_elements: &'v FxHashSet<&'static str>,
    out: String,
    stack: Vec<Open>,
}

impl<'v> Emitter<'v> {
    fn new(void_elements: &'v FxHashSet<&'static str>) -> Self {
        Self {
            void_elements,
            out: String::new(),
            stack: Vec::new(),
        }
    }

    fn run(mut self, lines: &[Line<'_>]) -> Result<String, CompileError> {
        // Whether the previous emitted line accepts nested lines
        let mut prev_opens = false;

        for (idx, line) in lines.iter().enumerate() {
            let is_else = is_else_line(line.text);
            self.close_until(line.level, is_else);

            let expected = self.stack.last().map_or(0, |open| open.level() + 1);
            let expected = if is_else { line.level.min(expected) } else { expected };
            if line.level > expected {
                let message = if prev_opens {
                    "indentation is deeper than one level"
                } else {
                    "illegal nesting: the previous line cannot hold nested content"
                };
                return Err(CompileError::syntax(line.number, message));
            }

            let has_children = lines
                .get(idx + 1)
                .is_some_and(|next| next.level > line.level);
            prev_opens = self.line(line, has_children)?;
        }

        self.close_until(0, false);
        Ok(self.out)
    }

    /// Pop and close every open construct at `level` or deeper.
    ///
    /// For an `- else` line, a block at exactly `level` stays open.
    fn close_until(&mut self, level: usize, keep_block: bool) {
        while let Some(open) = self.stack.last() {
            if open.level() < level {
                break;
            }
            if keep_block
                && open.level() == level
                && matches!(open, Open::Block { has_else: false, .. })
            {
                break;
            }
            if let Some(open) = self.stack.pop() {
                self.close(open);
            }
        }
    }

    fn close(&mut self, open: Open) {
        match open {
            Open::Tag { level, name } => self.emit(level, &format!("</{name}>")),
            Open::Block { level, keyword, .. } => self.emit(level, &format!("{{{{/{keyword}}}}}")),
            Open::Comment { level } => self.emit(level, "-->"),
        }
    }

    fn emit(&mut self, level: usize, text: &str) {
        for _ in 0..level {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    /// Emit one line. Returns whether it opened a construct.
    fn line(&mut self, line: &Line<'_>, has_children: bool) -> Result<bool, CompileError> {
        let (level, text, number) = (line.level, line.text, line.number);

        if text.starts_with("!!!") {
            self.emit(level, "<!DOCTYPE html>");
            return Ok(false);
        }
        if text.starts_with("-#") {
            return Ok(false);
        }
        if let Some(expr) = text.strip_prefix("!=") {
            self.emit(level, &format!("{{{{{{{}}}}}}}", check_output(expr, number)?));
            return Ok(false);
        }
        if let Some(expr) = text.strip_prefix('=') {
            self.emit(level, &format!("{{{{{}}}}}", check_output(expr, number)?));
            return Ok(false);
        }
        if let Some(rest) = text.strip_prefix('-') {
            return self.control(level, rest.trim(), number).map(|()| true);
        }
        if let Some(rest) = text.strip_prefix('/') {
            let note = rest.trim();
            if note.is_empty() {
                self.emit(level, "<!--");
                self.stack.push(Open::Comment { level });
                return Ok(true);
            }
            self.emit(level, &format!("<!-- {note} -->"));
            return Ok(false);
        }
        if let Some(rest) = text.strip_prefix('\\') {
            self.emit(level, &interpolate(rest, number)?);
            return Ok(false);
        }
        if text.starts_with('%')
            || text.starts_with('.')
            || (text.starts_with('#') && !text.starts_with("#{"))
        {
            return self.element(level, text, number, has_children);
        }

        self.emit(level, &interpolate(text, number)?);
        Ok(false)
    }

    /// `- keyword arg` lines.
    fn control(&mut self, level: usize, rest: &str, number: usize) -> Result<(), CompileError> {
        let (keyword, arg) = match rest.split_once(char::is_whitespace) {
            Some((keyword, arg)) => (keyword, arg.trim()),
            None => (rest, ""),
        };

        if keyword == "else" {
            if !arg.is_empty() {
                return Err(CompileError::syntax(number, "`- else` takes no argument"));
            }
            let Some(Open::Block {
                level: block_level,
                has_else,
                ..
            }) = self.stack.last_mut()
            else {
                return Err(orphan_else(number));
            };
            if *block_level != level || *has_else {
                return Err(orphan_else(number));
            }
            *has_else = true;
            self.emit(level, "{{else}}");
            return Ok(());
        }

        if !BLOCK_KEYWORDS.contains(&keyword) {
            return Err(CompileError::syntax(
                number,
                format!("unknown control keyword `{keyword}`"),
            ));
        }
        if arg.is_empty() {
            return Err(CompileError::syntax(
                number,
                format!("`- {keyword}` needs an argument"),
            ));
        }

        let arg = check_expr(arg, number)?;
        self.emit(level, &format!("{{{{#{keyword} {arg}}}}}"));
        self.stack.push(Open::Block {
            level,
            keyword: keyword.to_string(),
            has_else: false,
        });
        Ok(())
    }

    /// `%tag.class#id(attrs)/ content` lines.
    fn element(
        &mut self,
        level: usize,
        text: &str,
        number: usize,
        has_children: bool,
    ) -> Result<bool, CompileError> {
        let tag = parse_tag(text, number)?;
        let open = tag.open_tag();
        let is_void = tag.self_close || self.void_elements.contains(tag.name.as_str());

        if is_void {
            if tag.content.is_some() || has_children {
                return Err(CompileError::syntax(
                    number,
                    format!("self-closing tag `{}` cannot have content", tag.name),
                ));
            }
            self.emit(level, &open);
            return Ok(false);
        }

        match tag.content {
            Some(content) => {
                if has_children {
                    return Err(CompileError::syntax(
                        number,
                        "illegal nesting: content can't be both given on the same line and nested",
                    ));
                }
                self.emit(level, &format!("{open}{content}</{}>", tag.name));
                Ok(false)
            }
            None if has_children => {
                self.emit(level, &open);
                self.stack.push(Open::Tag {
                    level,
                    name: tag.name,
                });
                Ok(true)
            }
            None => {
                self.emit(level, &format!("{open}</{}>", tag.name));
                Ok(false)
            }
        }
    }
}

fn orphan_else(number: usize) -> CompileError {
    CompileError::syntax(
        number,
        "`- else` without a preceding `- if`, `- unless`, `- each` or `- with`",
    )
}

fn is_else_line(text: &str) -> bool {
    text.strip_prefix('-')
        .is_some_and(|rest| rest.trim_start().split_whitespace().next() == Some("else"))
}

// ============================================================================
// Tags
// ============================================================================

#[derive(Debug, Default)]
struct Tag {
    name: String,
    classes: Vec<String>,
    id: Option<String>,
    attrs: Vec<(String, Option<String>)>,
    self_close: bool,
    /// Compiled inline content
    content: Option<String>,
}

impl Tag {
    fn open_tag(&self) -> String {
        let mut open = format!("<{}", self.name);
        if !self.classes.is_empty() {
            push_attr(&mut open, "class", &self.classes.join(" "));
        }
        if let Some(id) = &self.id {
            push_attr(&mut open, "id", id);
        }
        for (name, value) in &self.attrs {
            match value {
                Some(value) => push_attr(&mut open, name, value),
                None => {
                    open.push(' ');
                    open.push_str(name);
                }
            }
        }
        open.push('>');
        open
    }
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    let quote = if value.contains('"') { '\'' } else { '"' };
    out.push(' ');
    out.push_str(name);
    out.push('=');
    out.push(quote);
    out.push_str(value);
    out.push(quote);
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':')
}

fn is_attr_char(c: char) -> bool {
    is_name_char(c) || matches!(c, '@' | '.')
}

/// Split the longest prefix whose chars satisfy `pred`.
fn take_while(s: &str, pred: impl Fn(char) -> bool) -> (&str, &str) {
    let end = s.find(|c: char| !pred(c)).unwrap_or(s.len());
    s.split_at(end)
}

fn parse_tag(text: &str, number: usize) -> Result<Tag, CompileError> {
    let mut tag = Tag::default();
    let mut rest = text;

    if let Some(after) = rest.strip_prefix('%') {
        let (name, after) = take_while(after, is_name_char);
        if name.is_empty() {
            return Err(CompileError::syntax(number, "tag name expected after `%`"));
        }
        tag.name = name.to_string();
        rest = after;
    } else {
        tag.name = "div".to_string();
    }

    loop {
        let Some(marker) = rest.chars().next().filter(|c| matches!(c, '.' | '#')) else {
            break;
        };
        let (value, after) = take_while(&rest[1..], |c| {
            c.is_ascii_alphanumeric() || matches!(c, '_' | '-')
        });
        if value.is_empty() {
            let what = if marker == '.' { "class" } else { "id" };
            return Err(CompileError::syntax(
                number,
                format!("{what} name expected after `{marker}`"),
            ));
        }
        if marker == '.' {
            tag.classes.push(value.to_string());
        } else {
            tag.id = Some(value.to_string());
        }
        rest = after;
    }

    if let Some(after) = rest.strip_prefix('(') {
        rest = parse_attrs(after, &mut tag, number)?;
    }

    if let Some(after) = rest.strip_prefix('/') {
        tag.self_close = true;
        rest = after;
    }

    tag.content = if let Some(expr) = rest.strip_prefix("!=") {
        Some(format!("{{{{{{{}}}}}}}", check_output(expr, number)?))
    } else if let Some(expr) = rest.strip_prefix('=') {
        Some(format!("{{{{{}}}}}", check_output(expr, number)?))
    } else if rest.is_empty() {
        None
    } else if rest.starts_with(' ') {
        let text = rest.trim();
        (!text.is_empty())
            .then(|| interpolate(text, number))
            .transpose()?
    } else {
        let c = rest.chars().next().unwrap_or(' ');
        return Err(CompileError::syntax(
            number,
            format!("unexpected `{c}` after tag `{}`", tag.name),
        ));
    };

    Ok(tag)
}

/// Parse `name="v" name='v' name=var flag)` and return what follows `)`.
fn parse_attrs<'a>(
    mut rest: &'a str,
    tag: &mut Tag,
    number: usize,
) -> Result<&'a str, CompileError> {
    let unterminated = || CompileError::syntax(number, "unterminated attribute list");

    loop {
        rest = rest.trim_start();
        if let Some(after) = rest.strip_prefix(')') {
            return Ok(after);
        }
        if rest.is_empty() {
            return Err(unterminated());
        }

        let (name, after) = take_while(rest, is_attr_char);
        if name.is_empty() {
            let c = rest.chars().next().unwrap_or(' ');
            return Err(CompileError::syntax(
                number,
                format!("unexpected `{c}` in attribute list"),
            ));
        }
        rest = after;

        let value = if let Some(after) = rest.strip_prefix('=') {
            let (value, after) = match after.chars().next() {
                Some(quote @ ('"' | '\'')) => {
                    let body = &after[1..];
                    let end = body.find(quote).ok_or_else(unterminated)?;
                    (interpolate(&body[..end], number)?, &body[end + 1..])
                }
                _ => {
                    let (var, after) = take_while(after, is_attr_char);
                    if var.is_empty() {
                        return Err(CompileError::syntax(
                            number,
                            format!("value expected for attribute `{name}`"),
                        ));
                    }
                    (format!("{{{{{var}}}}}"), after)
                }
            };
            rest = after;
            Some(value)
        } else {
            None
        };

        match (name, value) {
            ("class", Some(value)) => tag.classes.push(value),
            ("id", Some(value)) => tag.id = Some(value),
            (name, value) => tag.attrs.push((name.to_string(), value)),
        }
    }
}

// ============================================================================
// Text
// ============================================================================

/// Built-in helpers that produce a value inline (`= eq a b`).
const INLINE_HELPERS: &[&str] = &[
    "lookup", "log", "eq", "ne", "gt", "gte", "lt", "lte", "and", "or", "not",
];

/// Validate an expression whose value is written to the output.
///
/// Besides [`check_expr`], anything with arguments must call a built-in
/// helper. The renderer only finds unknown helpers at render time, long
/// after the artifact was written.
fn check_output(expr: &str, number: usize) -> Result<&str, CompileError> {
    let expr = check_expr(expr, number)?;
    if let Some((helper, _)) = expr.split_once(char::is_whitespace)
        && !INLINE_HELPERS.contains(&helper)
    {
        return Err(CompileError::syntax(
            number,
            format!("unknown helper `{helper}` in expression `{expr}`"),
        ));
    }
    Ok(expr)
}

/// Validate an inline expression and return it trimmed.
fn check_expr(expr: &str, number: usize) -> Result<&str, CompileError> {
    let expr = expr.trim();
    if expr.is_empty() {
        return Err(CompileError::syntax(number, "empty expression"));
    }
    if expr.contains("{{") || expr.contains("}}") {
        return Err(CompileError::syntax(
            number,
            "expression must not contain `{{` or `}}`",
        ));
    }
    Ok(expr)
}

/// Compile plain text: `#{expr}` becomes `{{expr}}`, literal `{{` is escaped.
fn interpolate(text: &str, number: usize) -> Result<String, CompileError> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("#{") {
            let end = after
                .find('}')
                .ok_or_else(|| CompileError::syntax(number, "unterminated `#{` interpolation"))?;
            let expr = check_output(&after[..end], number)?;
            out.push_str("{{");
            out.push_str(expr);
            out.push_str("}}");
            rest = &after[end + 1..];
        } else if let Some(after) = rest.strip_prefix("{{") {
            out.push_str("\\{{");
            rest = after;
        } else {
            let c = rest.chars().next().unwrap_or_default();
            out.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(source: &str) -> Result<String, CompileError> {
        HamlCompiler::new().compile(source)
    }

    fn syntax_line(err: CompileError) -> usize {
        match err {
            CompileError::Syntax { line, .. } => line,
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_compile_document() {
        let source = "\
!!!
%html
  %head
    %title= title
  %body
    %h1#main.title Welcome, #{name}!
    %ul
      - each items
        %li= this
    %br
";
        let expected = "\
<!DOCTYPE html>
<html>
  <head>
    <title>{{title}}</title>
  </head>
  <body>
    <h1 class=\"title\" id=\"main\">Welcome, {{name}}!</h1>
    <ul>
      {{#each items}}
        <li>{{this}}</li>
      {{/each}}
    </ul>
    <br>
  </body>
</html>
";
        assert_eq!(compile(source).unwrap(), expected);
    }

    #[test]
    fn test_indent_unit_from_first_indented_line() {
        let source = "%div\n    %p a\n    %p b\n";
        assert_eq!(compile(source).unwrap(), "<div>\n  <p>a</p>\n  <p>b</p>\n</div>\n");
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(compile("").unwrap(), "");
        assert_eq!(compile("\n   \n").unwrap(), "");
    }

    #[test]
    fn test_implicit_div_and_attributes() {
        assert_eq!(compile(".box.wide").unwrap(), "<div class=\"box wide\"></div>\n");
        assert_eq!(compile("#main").unwrap(), "<div id=\"main\"></div>\n");
        assert_eq!(
            compile("%a.btn(href=\"/x\" class='big' data-id=item.id disabled) Go").unwrap(),
            "<a class=\"btn big\" href=\"/x\" data-id=\"{{item.id}}\" disabled>Go</a>\n"
        );
        assert_eq!(
            compile("%img(src=\"#{src}\" alt='say \"hi\"')").unwrap(),
            "<img src=\"{{src}}\" alt='say \"hi\"'>\n"
        );
    }

    #[test]
    fn test_expressions() {
        assert_eq!(compile("= title").unwrap(), "{{title}}\n");
        assert_eq!(compile("!= body").unwrap(), "{{{body}}}\n");
        assert_eq!(compile("%p!= body").unwrap(), "<p>{{{body}}}</p>\n");
    }

    #[test]
    fn test_if_else_block() {
        let source = "- if user\n  %p= user.name\n- else\n  %p Guest\n%footer";
        assert_eq!(
            compile(source).unwrap(),
            "{{#if user}}\n  <p>{{user.name}}</p>\n{{else}}\n  <p>Guest</p>\n{{/if}}\n<footer></footer>\n"
        );
    }

    #[test]
    fn test_comments() {
        let source = "/ visible\n-# hidden\n  %p dropped too\n/\n  %p wrapped\n%p kept";
        assert_eq!(
            compile(source).unwrap(),
            "<!-- visible -->\n<!--\n  <p>wrapped</p>\n-->\n<p>kept</p>\n"
        );
    }

    #[test]
    fn test_silent_comment_body_is_not_checked() {
        let source = "%div\n  -# notes\n       odd indent\n\t\t\ttabbed\n     - while x\n  %p kept";
        assert_eq!(compile(source).unwrap(), "<div>\n  <p>kept</p>\n</div>\n");
        assert_eq!(compile("-# only\n   x").unwrap(), "");
    }

    #[test]
    fn test_plain_text_escapes() {
        assert_eq!(compile("\\%not a tag").unwrap(), "%not a tag\n");
        assert_eq!(compile("#{a} and {{b}}").unwrap(), "{{a}} and \\{{b}}\n");
    }

    #[test]
    fn test_error_tabs() {
        assert_eq!(syntax_line(compile("%div\n\t%p x").unwrap_err()), 2);
    }

    #[test]
    fn test_error_inconsistent_indent() {
        assert_eq!(syntax_line(compile("%div\n  %p\n     %b x").unwrap_err()), 3);
    }

    #[test]
    fn test_error_too_deep() {
        assert_eq!(syntax_line(compile("%div\n  %p\n      %b x").unwrap_err()), 3);
    }

    #[test]
    fn test_error_nested_under_inline_content() {
        assert_eq!(syntax_line(compile("%p text\n  %b x").unwrap_err()), 1);
        assert_eq!(syntax_line(compile("= a\n  %b x").unwrap_err()), 2);
    }

    #[test]
    fn test_error_void_with_content() {
        assert_eq!(syntax_line(compile("%br text").unwrap_err()), 1);
        assert_eq!(syntax_line(compile("%div/\n  %p x").unwrap_err()), 1);
    }

    #[test]
    fn test_error_unterminated() {
        assert_eq!(syntax_line(compile("%a(href=\"x\"").unwrap_err()), 1);
        assert_eq!(syntax_line(compile("%p\n  hi #{name").unwrap_err()), 2);
    }

    #[test]
    fn test_error_control() {
        assert_eq!(syntax_line(compile("- while x").unwrap_err()), 1);
        assert_eq!(syntax_line(compile("- if").unwrap_err()), 1);
        assert_eq!(syntax_line(compile("%p\n- else").unwrap_err()), 2);
        assert_eq!(syntax_line(compile("- if a\n  x\n- else\n  y\n- else").unwrap_err()), 5);
    }

    #[test]
    fn test_error_bad_expression() {
        assert_eq!(syntax_line(compile("=   ").unwrap_err()), 1);
        assert_eq!(syntax_line(compile("%p\n  = a}}b").unwrap_err()), 2);
        assert_eq!(syntax_line(compile("%").unwrap_err()), 1);
        assert_eq!(syntax_line(compile("%p.").unwrap_err()), 1);
    }

    #[test]
    fn test_builtin_helpers_in_expressions() {
        assert_eq!(compile("= lookup items 1").unwrap(), "{{lookup items 1}}\n");
        assert_eq!(compile("%p= eq a b").unwrap(), "<p>{{eq a b}}</p>\n");
        assert_eq!(compile("%p x #{log msg}").unwrap(), "<p>x {{log msg}}</p>\n");
    }

    #[test]
    fn test_error_unknown_helper() {
        assert_eq!(syntax_line(compile("= foo bar").unwrap_err()), 1);
        assert_eq!(syntax_line(compile("%p\n  %b!= shout name").unwrap_err()), 2);
        assert_eq!(syntax_line(compile("%p hi #{upper name}").unwrap_err()), 1);
        // block arguments are unaffected
        assert!(compile("- if (eq a b)\n  x").is_ok());
    }

    #[test]
    fn test_error_unbalanced_block_expression() {
        // Passes the line checks but cannot be parsed as a helper call
        assert!(matches!(
            compile("- if (a\n  x"),
            Err(CompileError::Template(_))
        ));
    }
}

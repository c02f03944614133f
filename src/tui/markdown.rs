use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Parse markdown and convert to styled ratatui Lines
pub fn parse_markdown(input: &str) -> Vec<Line<'static>> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let mut renderer = MarkdownRenderer::default();
    for event in Parser::new_ext(input, options) {
        renderer.handle(event);
    }
    renderer.finish()
}

#[derive(Default)]
struct MarkdownRenderer {
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    styles: Vec<Style>,
    code_block: Option<String>,
    list_depth: usize,
}

impl MarkdownRenderer {
    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or_default()
    }

    fn flush(&mut self) {
        if !self.spans.is_empty() {
            self.lines.push(Line::from(std::mem::take(&mut self.spans)));
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => {
                let style = self.start(tag);
                self.styles.push(style);
            }
            Event::End(tag) => {
                self.styles.pop();
                self.end(tag);
            }
            Event::Text(text) => match self.code_block.as_mut() {
                Some(code) => code.push_str(&text),
                None => {
                    let style = self.style();
                    self.spans.push(Span::styled(text.to_string(), style));
                }
            },
            Event::Code(code) => {
                self.spans.push(Span::styled(
                    format!(" {} ", code),
                    Style::default().fg(Color::Yellow).bg(Color::Rgb(40, 40, 40)),
                ));
            }
            Event::SoftBreak | Event::HardBreak => self.flush(),
            Event::Rule => {
                self.flush();
                self.lines.push(Line::from(Span::styled(
                    "─".repeat(24),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) -> Style {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush();
                let (prefix, style) = match level {
                    HeadingLevel::H1 => ("# ", Style::default().fg(Color::Cyan)),
                    HeadingLevel::H2 => ("## ", Style::default().fg(Color::Blue)),
                    HeadingLevel::H3 => ("### ", Style::default().fg(Color::Green)),
                    _ => ("#### ", Style::default().fg(Color::Yellow)),
                };
                let style = style.add_modifier(Modifier::BOLD);
                self.spans.push(Span::styled(prefix, style));
                style
            }
            Tag::Emphasis => self.style().add_modifier(Modifier::ITALIC),
            Tag::Strong => self.style().add_modifier(Modifier::BOLD),
            Tag::Strikethrough => self.style().add_modifier(Modifier::CROSSED_OUT),
            Tag::CodeBlock(kind) => {
                self.flush();
                let lang = match kind {
                    CodeBlockKind::Fenced(lang) => lang.to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                self.lines.push(Line::from(vec![
                    Span::styled("```", Style::default().fg(Color::DarkGray)),
                    Span::styled(lang, Style::default().fg(Color::Magenta)),
                ]));
                self.code_block = Some(String::new());
                Style::default().fg(Color::Gray)
            }
            Tag::List(_) => {
                self.list_depth += 1;
                self.flush();
                self.style()
            }
            Tag::Item => {
                let indent = "  ".repeat(self.list_depth.saturating_sub(1));
                self.spans.push(Span::raw(indent));
                self.spans
                    .push(Span::styled("• ", Style::default().fg(Color::Yellow)));
                self.style()
            }
            Tag::Link { .. } => {
                self.spans
                    .push(Span::styled("[", Style::default().fg(Color::Blue)));
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::UNDERLINED)
            }
            Tag::BlockQuote(_) => {
                self.flush();
                self.spans
                    .push(Span::styled("│ ", Style::default().fg(Color::DarkGray)));
                Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC)
            }
            _ => self.style(),
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_)
            | TagEnd::Paragraph
            | TagEnd::Item
            | TagEnd::BlockQuote(_)
            | TagEnd::TableRow
            | TagEnd::TableHead => self.flush(),
            TagEnd::TableCell => self.spans.push(Span::raw("  ")),
            TagEnd::CodeBlock => {
                if let Some(code) = self.code_block.take() {
                    for line in code.lines() {
                        self.lines.push(Line::from(Span::styled(
                            line.to_string(),
                            Style::default().fg(Color::Gray),
                        )));
                    }
                }
                self.lines.push(Line::from(Span::styled(
                    "```",
                    Style::default().fg(Color::DarkGray),
                )));
            }
            TagEnd::List(_) => {
                self.list_depth = self.list_depth.saturating_sub(1);
            }
            TagEnd::Link => {
                self.spans
                    .push(Span::styled("]", Style::default().fg(Color::Blue)));
            }
            _ => {}
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        self.lines
    }
}

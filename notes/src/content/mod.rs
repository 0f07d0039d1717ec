use std::fmt;

/// A block of body content inside an item.
/// Blocks have no identity beyond their position in the item.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    /// A bullet list, possibly nested.
    Bullets(Vec<Bullet>),
    Table {
        alignments: Vec<ColumnAlignment>,
        headers: Vec<Vec<InlineNode>>,
        rows: Vec<Vec<Vec<InlineNode>>>,
    },
    Paragraph(Vec<InlineNode>),
    Code {
        language: Option<String>,
        content: String,
    },
    Quote(Vec<ContentBlock>),
}

/// One bullet entry with its nested sub-entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Bullet {
    pub text: Vec<InlineNode>,
    pub children: Vec<Bullet>,
}

/// Inline elements that appear within a line of text.
/// Inline types nest freely within one another.
#[derive(Debug, Clone, PartialEq)]
pub enum InlineNode {
    Text(String),
    Strong(Vec<InlineNode>),
    Emphasis(Vec<InlineNode>),
    Strikethrough(Vec<InlineNode>),
    CodeSpan(String),
    Link {
        dest: String,
        title: String,
        content: Vec<InlineNode>,
    },
    SoftBreak,
    HardBreak,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnAlignment {
    None,
    Left,
    Center,
    Right,
}

impl fmt::Display for ContentBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentBlock::Bullets(bullets) => {
                for bullet in bullets {
                    write_bullet(f, bullet, 0)?;
                }
                Ok(())
            }
            ContentBlock::Table { headers, rows, .. } => {
                write!(f, "|")?;
                for header in headers {
                    write!(f, " ")?;
                    for inline in header {
                        write!(f, "{}", inline)?;
                    }
                    write!(f, " |")?;
                }
                writeln!(f)?;
                write!(f, "|")?;
                for _ in headers {
                    write!(f, "---|")?;
                }
                writeln!(f)?;
                for row in rows {
                    write!(f, "|")?;
                    for cell in row {
                        write!(f, " ")?;
                        for inline in cell {
                            write!(f, "{}", inline)?;
                        }
                        write!(f, " |")?;
                    }
                    writeln!(f)?;
                }
                Ok(())
            }
            ContentBlock::Paragraph(inlines) => {
                for inline in inlines {
                    write!(f, "{}", inline)?;
                }
                writeln!(f)
            }
            ContentBlock::Code { language, content } => {
                write!(f, "```")?;
                if let Some(lang) = language {
                    write!(f, "{}", lang)?;
                }
                writeln!(f)?;
                write!(f, "{}", content)?;
                writeln!(f, "```")
            }
            ContentBlock::Quote(blocks) => {
                let mut text = String::new();
                for block in blocks {
                    text.push_str(&block.to_string());
                }
                for line in text.lines() {
                    writeln!(f, "> {}", line)?;
                }
                Ok(())
            }
        }
    }
}

fn write_bullet(f: &mut fmt::Formatter<'_>, bullet: &Bullet, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        write!(f, "  ")?;
    }
    write!(f, "- ")?;
    for inline in &bullet.text {
        write!(f, "{}", inline)?;
    }
    writeln!(f)?;
    for child in &bullet.children {
        write_bullet(f, child, depth + 1)?;
    }
    Ok(())
}

impl fmt::Display for InlineNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InlineNode::Text(s) => write!(f, "{}", s),
            InlineNode::Strong(children) => {
                write!(f, "**")?;
                for child in children {
                    write!(f, "{}", child)?;
                }
                write!(f, "**")
            }
            InlineNode::Emphasis(children) => {
                write!(f, "*")?;
                for child in children {
                    write!(f, "{}", child)?;
                }
                write!(f, "*")
            }
            InlineNode::Strikethrough(children) => {
                write!(f, "~~")?;
                for child in children {
                    write!(f, "{}", child)?;
                }
                write!(f, "~~")
            }
            InlineNode::CodeSpan(code) => write!(f, "`{}`", code),
            InlineNode::Link { dest, content, .. } => {
                write!(f, "[")?;
                for child in content {
                    write!(f, "{}", child)?;
                }
                write!(f, "]({})", dest)
            }
            InlineNode::SoftBreak => writeln!(f),
            InlineNode::HardBreak => writeln!(f),
        }
    }
}

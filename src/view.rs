//! Draws viewable objects into a terminal window.

use crate::clock::HasAge;
use crate::record::ResultRecord;
use colored::Colorize;
use indoc::formatdoc;
use textwrap::Options;

/// Widest the table output will ever get, even on a huge terminal.
pub const MAX_WIDTH: usize = 100;

const INDENT: &str = "  ";

/// View renderer options.
#[derive(Debug)]
pub struct ViewOptions {
    color: bool,
    width: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            color: false,
            width: MAX_WIDTH,
        }
    }
}

impl ViewOptions {
    /// Incrementally builds a new set of view options.
    ///
    /// # Examples
    ///
    /// ```
    /// use subscout::view::ViewOptions;
    /// let opts = ViewOptions::build().color(true).width(72).build();
    /// assert_eq!(opts.width(), 72);
    /// ```
    pub fn build() -> ViewOptionsBuilder {
        ViewOptionsBuilder::default()
    }

    /// Options suited to the current terminal: its width (up to
    /// [`MAX_WIDTH`]), with color if `color` is set.
    pub fn for_terminal(color: bool) -> Self {
        Self::build()
            .color(color)
            .width(textwrap::termwidth())
            .build()
    }

    /// True if output should include ANSI colors.
    pub fn color(&self) -> bool {
        self.color
    }

    /// Column at which output is wrapped.
    pub fn width(&self) -> usize {
        self.width
    }
}

/// A builder for view options.
///
/// You probably don't want to use this directly; call [`ViewOptions::build()`]
/// and construct it incrementally instead.
#[derive(Debug, Default)]
#[must_use]
pub struct ViewOptionsBuilder {
    color: bool,
    width: Option<usize>,
}

impl ViewOptionsBuilder {
    /// Sets the "color" option to true or false.
    pub fn color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Sets the wrap width. Values above [`MAX_WIDTH`] are clamped.
    pub fn width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    /// Finalizes the [`ViewOptions`].
    pub fn build(self) -> ViewOptions {
        ViewOptions {
            color: self.color,
            width: self.width.unwrap_or(MAX_WIDTH).clamp(20, MAX_WIDTH),
        }
    }
}

/// Marks an item that can be converted into a string for display on a terminal.
pub trait Viewable {
    /// Converts the item into a string for display on a terminal.
    fn view(&self, opts: &ViewOptions) -> String;
}

fn field(label: &str, value: &str, opts: &ViewOptions) -> String {
    let initial = format!("{INDENT}{label}: ");
    let subsequent = " ".repeat(initial.len());
    let wrap = Options::new(opts.width())
        .initial_indent(&initial)
        .subsequent_indent(&subsequent);
    textwrap::fill(value, wrap)
}

impl Viewable for ResultRecord {
    fn view(&self, opts: &ViewOptions) -> String {
        let heading = format!(
            "[{} upvotes, {} comments] r/{}",
            self.score, self.comments, self.subreddit
        );
        let heading = if opts.color() {
            heading.bold().to_string()
        } else {
            heading
        };

        let mut lines = vec![heading, field("Title", &self.title, opts)];
        let body = crate::text::squash_whitespace(&self.body);
        if !body.is_empty() {
            lines.push(field("Body", &body, opts));
        }
        lines.push(formatdoc! {"
            {INDENT}URL: {}
            {INDENT}Author: u/{}
            {INDENT}Created: {}",
            self.url,
            self.author,
            self.created_local().format("%b %d, %Y %I:%M %p"),
        });
        lines.join("\n")
    }
}

impl Viewable for [ResultRecord] {
    fn view(&self, opts: &ViewOptions) -> String {
        let mut s = format!("Found {} relevant posts:\n", self.len());
        for record in self {
            s += "\n";
            s += &record.view(opts);
            s += "\n";
        }
        s
    }
}

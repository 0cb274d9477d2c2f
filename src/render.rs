//! Listing renderers: terminal text, bare names, HTML.
//!
//! Every renderer expects channels already in listing order and writes
//! consecutive channels of the same game under one heading.

use std::io::{self, Write};

use crate::channel::Channel;
use crate::collect::Section;

const TERM_EMPH: &str = "\x1b[01;37m";
const TERM_RESET: &str = "\x1b[00m";

/// How a listing is written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Section title, game headings, aligned channel lines.
    Text { emphasis: bool },
    /// One streamer per line.
    Names,
    /// Nested `<ul>` lists grouped by game.
    Html,
}

impl Format {
    /// Write the document preamble, if the format has one.
    pub fn write_header(self, w: &mut dyn Write) -> io::Result<()> {
        if self == Format::Html {
            write_html_header(w)?;
        }
        Ok(())
    }

    pub fn write_footer(self, w: &mut dyn Write) -> io::Result<()> {
        if self == Format::Html {
            write_html_footer(w)?;
        }
        Ok(())
    }

    /// Header, every section in order, footer.
    pub fn write_document(self, w: &mut dyn Write, sections: &[Section]) -> io::Result<()> {
        self.write_header(w)?;
        for section in sections {
            self.write_section(w, section.title, &section.channels)?;
        }
        self.write_footer(w)
    }

    /// Write one titled section. Empty sections produce no output at all.
    pub fn write_section(self, w: &mut dyn Write, title: &str, channels: &[Channel]) -> io::Result<()> {
        if channels.is_empty() {
            return Ok(());
        }
        match self {
            Format::Text { emphasis } => {
                writeln!(w)?;
                writeln!(w, "{title}")?;
                write_text(w, channels, emphasis)
            }
            Format::Names => write_names(w, channels),
            Format::Html => write_html(w, channels),
        }
    }
}

/// Consecutive runs of channels sharing a game.
fn by_game(channels: &[Channel]) -> impl Iterator<Item = &[Channel]> {
    channels.chunk_by(|a, b| a.game == b.game)
}

pub fn write_text(w: &mut dyn Write, channels: &[Channel], emphasis: bool) -> io::Result<()> {
    let (emph, reset) = if emphasis { (TERM_EMPH, TERM_RESET) } else { ("", "") };
    for group in by_game(channels) {
        writeln!(w, "\n{emph}{}{reset}:", group[0].game)?;
        for ch in group {
            writeln!(
                w,
                "  {:<20} {:>4}: {}",
                ch.streamer,
                ch.viewers,
                ch.description.trim()
            )?;
        }
    }
    Ok(())
}

pub fn write_names(w: &mut dyn Write, channels: &[Channel]) -> io::Result<()> {
    for ch in channels {
        writeln!(w, "{}", ch.streamer)?;
    }
    Ok(())
}

pub fn write_html_header(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "<html>")?;
    writeln!(w, "<head>")?;
    writeln!(w, "\t<meta charset=\"UTF-8\">")?;
    writeln!(w, "\t<title>Twitchbrowser</title>")?;
    writeln!(w, "</head>")?;
    writeln!(w, "<body>")
}

pub fn write_html_footer(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "</body>")?;
    writeln!(w, "</html>")
}

pub fn write_html(w: &mut dyn Write, channels: &[Channel]) -> io::Result<()> {
    writeln!(w, "<ul>")?;
    for group in by_game(channels) {
        writeln!(w, "<li><b>{}:</b></li>", html_escape::encode_text(&group[0].game))?;
        writeln!(w, "\t<ul>")?;
        for ch in group {
            // Pad before escaping so entities don't skew the column.
            let streamer = format!("{:<20}", ch.streamer);
            writeln!(
                w,
                "\t\t<li>{} {:>4}: {}</li>",
                html_escape::encode_text(&streamer),
                ch.viewers,
                html_escape::encode_text(ch.description.trim())
            )?;
        }
        writeln!(w, "\t</ul>")?;
    }
    writeln!(w, "</ul>")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ch(game: &str, viewers: u64, streamer: &str, description: &str) -> Channel {
        Channel {
            streamer: streamer.to_string(),
            description: description.to_string(),
            game: game.to_string(),
            viewers,
        }
    }

    fn sample() -> Vec<Channel> {
        vec![
            ch("Celeste", 120, "madeline", "  any% "),
            ch("Celeste", 7, "badeline", "chill"),
            ch("Tetris", 4521, "jonas", "CTWC <finals> & more"),
        ]
    }

    fn render(f: impl FnOnce(&mut dyn Write) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn text_groups_by_game() {
        let out = render(|w| write_text(w, &sample(), false));
        assert_eq!(
            out,
            "\nCeleste:\n  madeline              120: any%\n  badeline                7: chill\n\
             \nTetris:\n  jonas                4521: CTWC <finals> & more\n"
        );
    }

    #[test]
    fn text_emphasises_game_headings() {
        let out = render(|w| write_text(w, &sample()[..1], true));
        assert!(out.starts_with("\n\x1b[01;37mCeleste\x1b[00m:\n"));
    }

    #[test]
    fn wide_values_are_not_truncated() {
        let out = render(|w| write_text(w, &[ch("G", 123_456, "a_very_long_streamer_name", "")], false));
        assert!(out.contains("  a_very_long_streamer_name 123456: \n"));
    }

    #[test]
    fn names_are_one_per_line() {
        let out = render(|w| write_names(w, &sample()));
        assert_eq!(out, "madeline\nbadeline\njonas\n");
    }

    #[test]
    fn html_escapes_and_nests() {
        let out = render(|w| write_html(w, &sample()));
        let expected = "<ul>\n\
            <li><b>Celeste:</b></li>\n\
            \t<ul>\n\
            \t\t<li>madeline              120: any%</li>\n\
            \t\t<li>badeline                7: chill</li>\n\
            \t</ul>\n\
            <li><b>Tetris:</b></li>\n\
            \t<ul>\n\
            \t\t<li>jonas                4521: CTWC &lt;finals&gt; &amp; more</li>\n\
            \t</ul>\n\
            </ul>\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn sections_carry_titles_and_skip_when_empty() {
        let text = Format::Text { emphasis: false };
        assert_eq!(render(|w| text.write_section(w, "FAV", &[])), "");

        let out = render(|w| text.write_section(w, "FAV", &sample()[2..]));
        assert!(out.starts_with("\nFAV\n\nTetris:\n"));

        // Only text output carries section titles.
        let out = render(|w| Format::Names.write_section(w, "FAV", &sample()[2..]));
        assert_eq!(out, "jonas\n");
    }

    #[test]
    fn html_document_wraps_sections() {
        let out = render(|w| {
            Format::Html.write_header(w)?;
            Format::Html.write_section(w, "SRL", &sample()[..1])?;
            Format::Html.write_footer(w)
        });
        assert!(out.starts_with("<html>\n<head>\n"));
        assert!(out.contains("<title>Twitchbrowser</title>"));
        assert!(out.ends_with("</ul>\n</body>\n</html>\n"));
        assert!(!out.contains("SRL"));
    }

    #[test]
    fn header_and_footer_are_html_only() {
        let text = Format::Text { emphasis: true };
        assert_eq!(render(|w| text.write_header(w)), "");
        assert_eq!(render(|w| Format::Names.write_footer(w)), "");
    }

    #[test]
    fn document_lists_sections_in_order() {
        let sections = vec![
            Section { title: "FAV", channels: sample()[..1].to_vec().into() },
            Section { title: "SRL", channels: crate::channel::Channels::new() },
            Section { title: "CUSTOM", channels: sample()[2..].to_vec().into() },
        ];
        let out = render(|w| Format::Text { emphasis: false }.write_document(w, &sections));
        let fav = out.find("FAV").unwrap();
        let custom = out.find("CUSTOM").unwrap();
        assert!(fav < custom);
        assert!(!out.contains("SRL"));
    }
}

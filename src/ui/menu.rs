use std::io::{self, Write};

/// Width of the `=` rules framing the main menu.
const MENU_RULE_WIDTH: usize = 50;

/// The numbered actions offered by the main menu, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    AddBook,
    ViewBooks,
    FindBookById,
    FindBooksByTitle,
    FindBooksByAuthor,
    UpdateBookStatus,
    DeleteBook,
    AddReview,
    ViewReviews,
    FindReviewsByBook,
    FindReviewsByRating,
    DeleteReview,
    ViewStatistics,
    Exit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 14] = [
        MenuAction::AddBook,
        MenuAction::ViewBooks,
        MenuAction::FindBookById,
        MenuAction::FindBooksByTitle,
        MenuAction::FindBooksByAuthor,
        MenuAction::UpdateBookStatus,
        MenuAction::DeleteBook,
        MenuAction::AddReview,
        MenuAction::ViewReviews,
        MenuAction::FindReviewsByBook,
        MenuAction::FindReviewsByRating,
        MenuAction::DeleteReview,
        MenuAction::ViewStatistics,
        MenuAction::Exit,
    ];

    /// Parse the user's menu choice. Anything but `1`-`14` is `None`.
    pub fn parse(choice: &str) -> Option<Self> {
        let number = choice.trim().parse::<usize>().ok()?;
        Self::ALL.get(number.checked_sub(1)?).copied()
    }

    pub fn number(self) -> usize {
        Self::ALL
            .iter()
            .position(|action| *action == self)
            .map_or(0, |index| index + 1)
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::AddBook => "Add New Book",
            MenuAction::ViewBooks => "View All Books",
            MenuAction::FindBookById => "Find Book by ID",
            MenuAction::FindBooksByTitle => "Find Books by Title",
            MenuAction::FindBooksByAuthor => "Find Books by Author",
            MenuAction::UpdateBookStatus => "Update Book Status",
            MenuAction::DeleteBook => "Delete Book",
            MenuAction::AddReview => "Add Review to Book",
            MenuAction::ViewReviews => "View All Reviews",
            MenuAction::FindReviewsByBook => "Find Reviews by Book",
            MenuAction::FindReviewsByRating => "Find Reviews by Rating",
            MenuAction::DeleteReview => "Delete Review",
            MenuAction::ViewStatistics => "View Reading Statistics",
            MenuAction::Exit => "Exit",
        }
    }

    /// Section heading printed before this action, if it opens a section.
    fn section(self) -> Option<&'static str> {
        match self {
            MenuAction::AddBook => Some("BOOK MANAGEMENT"),
            MenuAction::AddReview => Some("\nREVIEW MANAGEMENT"),
            MenuAction::ViewStatistics => Some("\nSTATISTICS"),
            _ => None,
        }
    }
}

/// Print the framed main menu.
pub fn render_menu(out: &mut impl Write) -> io::Result<()> {
    let rule = "=".repeat(MENU_RULE_WIDTH);
    writeln!(out, "\n{rule}")?;
    writeln!(out, "📚 BOOK TRACKER CLI")?;
    writeln!(out, "{rule}")?;
    for action in MenuAction::ALL {
        if let Some(section) = action.section() {
            writeln!(out, "{section}")?;
        }
        let number = format!("{}.", action.number());
        writeln!(out, "{number:<4}{}", action.label())?;
    }
    writeln!(out, "{rule}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_every_listed_number() {
        for (index, action) in MenuAction::ALL.iter().enumerate() {
            assert_eq!(MenuAction::parse(&(index + 1).to_string()), Some(*action));
            assert_eq!(action.number(), index + 1);
        }
        assert_eq!(MenuAction::parse(" 14\n"), Some(MenuAction::Exit));
    }

    #[test]
    fn parse_rejects_out_of_range_and_garbage() {
        for choice in ["0", "15", "-1", "", "add", "1.5"] {
            assert_eq!(MenuAction::parse(choice), None, "choice {choice:?}");
        }
    }

    #[test]
    fn rendered_menu_lists_all_actions() {
        let mut out = Vec::new();
        render_menu(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("1.  Add New Book"));
        assert!(text.contains("10. Find Reviews by Book"));
        assert!(text.contains("14. Exit"));
        assert!(text.contains("REVIEW MANAGEMENT"));
    }
}

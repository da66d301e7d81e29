/// Forms the evaluator handles itself instead of applying a function.
/// Matched by exact, case-sensitive head symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialForm {
    Def,
    Let,
    Do,
    If,
    Fn,
}

impl SpecialForm {
    pub fn from_symbol(name: &str) -> Option<Self> {
        match name {
            "def!" => Some(SpecialForm::Def),
            "let*" => Some(SpecialForm::Let),
            "do" => Some(SpecialForm::Do),
            "if" => Some(SpecialForm::If),
            "fn*" => Some(SpecialForm::Fn),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SpecialForm::Def => "def!",
            SpecialForm::Let => "let*",
            SpecialForm::Do => "do",
            SpecialForm::If => "if",
            SpecialForm::Fn => "fn*",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for form in [
            SpecialForm::Def,
            SpecialForm::Let,
            SpecialForm::Do,
            SpecialForm::If,
            SpecialForm::Fn,
        ] {
            assert_eq!(SpecialForm::from_symbol(form.name()), Some(form));
        }
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert_eq!(SpecialForm::from_symbol("IF"), None);
        assert_eq!(SpecialForm::from_symbol("def"), None);
        assert_eq!(SpecialForm::from_symbol("fn"), None);
    }
}

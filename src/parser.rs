use crate::ast::*;
use crate::bytecode::Opcode;
use crate::error::{Error, Result, SyntaxErrorKind};
use crate::lexer::{Lexer, TokenInfo};
use crate::literal::parse_literal;
use crate::token::Token;

pub struct Parser {
    tokens: Vec<TokenInfo>,
    pos: usize,
    source_lines: Vec<String>,
}

impl Parser {
    pub fn new(input: &str) -> Self {
        let mut lexer = Lexer::new(input);
        Parser {
            tokens: lexer.tokenize(),
            pos: 0,
            source_lines: input.lines().map(|l| l.trim().to_string()).collect(),
        }
    }

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).map(|t| &t.token).unwrap_or(&Token::Eof)
    }

    fn current_line(&self) -> usize {
        self.tokens.get(self.pos).map(|t| t.line).unwrap_or(0)
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn skip_newlines(&mut self) {
        while self.current() == &Token::Newline {
            self.advance();
        }
    }

    /// Words up to the end of the current line; consumes the terminator.
    fn take_line(&mut self) -> Vec<String> {
        let mut words = Vec::new();
        loop {
            match self.current().clone() {
                Token::Word(w) => {
                    words.push(w);
                    self.advance();
                }
                Token::Newline => {
                    self.advance();
                    break;
                }
                Token::Eof => break,
            }
        }
        words
    }

    fn syntax_error(&self, line: usize, kind: SyntaxErrorKind) -> Error {
        let text = self
            .source_lines
            .get(line.saturating_sub(1))
            .cloned()
            .unwrap_or_default();
        Error::Syntax { line, text, kind }
    }

    /// Decode the whole script. Nothing is returned unless every line is
    /// valid, so a bad last line still rejects the program as a whole.
    pub fn parse(&mut self) -> Result<Program> {
        let mut program = Program::new();

        self.skip_newlines();

        while self.current() != &Token::Eof {
            let line = self.current_line();
            let words = self.take_line();
            let Some((name, rest)) = words.split_first() else {
                continue;
            };
            let instruction = decode_instruction(name, rest)
                .map_err(|kind| self.syntax_error(line, kind))?;
            program.push(instruction, line);
            self.skip_newlines();
        }

        Ok(program)
    }
}

/// Check one mnemonic and its operand tokens. Shared by every front end so
/// scripts and YAML programs follow the same arity and literal rules.
pub(crate) fn decode_instruction(
    name: &str,
    rest: &[String],
) -> std::result::Result<Instruction, SyntaxErrorKind> {
    let op = Opcode::from_mnemonic(name)
        .ok_or_else(|| SyntaxErrorKind::UnknownOpcode(name.to_string()))?;

    let operand = match (op.has_operand(), rest) {
        (true, []) => return Err(SyntaxErrorKind::MissingOperand(op)),
        (true, [token]) => Some(
            parse_literal(token).map_err(|_| SyntaxErrorKind::InvalidLiteral(token.clone()))?,
        ),
        (true, [_, extra, ..]) => return Err(SyntaxErrorKind::TrailingToken(extra.clone())),
        (false, []) => None,
        (false, [_, ..]) => return Err(SyntaxErrorKind::UnexpectedOperand(op)),
    };

    Ok(Instruction::new(op, operand))
}

/// Decode script text into a program.
pub fn parse_program(source: &str) -> Result<Program> {
    Parser::new(source).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn syntax_kind(src: &str) -> (usize, String, SyntaxErrorKind) {
        match parse_program(src) {
            Err(Error::Syntax { line, text, kind }) => (line, text, kind),
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_simple_program() {
        let program = parse_program("load 255\nwrite 50\nread 0x32\nsgn\n").unwrap();
        assert_eq!(
            program.instructions,
            vec![
                Instruction::load(255u32),
                Instruction::write(50u32),
                Instruction::read(50u32),
                Instruction::sgn(),
            ]
        );
        assert_eq!(program.lines, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let src = "# Test: sign of a negative byte\n\n  load 0b11110110   # -10\n\t\nwrite 10\n# Expected: memory[10] = 246";
        let program = parse_program(src).unwrap();
        assert_eq!(
            program.instructions,
            vec![Instruction::load(246u32), Instruction::write(10u32)]
        );
        assert_eq!(program.lines, vec![3, 5]);
    }

    #[test]
    fn test_empty_script() {
        assert!(parse_program("").unwrap().is_empty());
        assert!(parse_program("# nothing\n\n   \n").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_opcode() {
        let (line, text, kind) = syntax_kind("load 5\nwrite 1\n  loadd 5  \n");
        assert_eq!(line, 3);
        assert_eq!(text, "loadd 5");
        assert_eq!(kind, SyntaxErrorKind::UnknownOpcode("loadd".into()));
    }

    #[test]
    fn test_opcode_case_sensitive() {
        let (_, _, kind) = syntax_kind("LOAD 5");
        assert_eq!(kind, SyntaxErrorKind::UnknownOpcode("LOAD".into()));
    }

    #[test]
    fn test_arity() {
        assert_eq!(syntax_kind("load").2, SyntaxErrorKind::MissingOperand(Opcode::Load));
        assert_eq!(syntax_kind("write # 5").2, SyntaxErrorKind::MissingOperand(Opcode::Write));
        assert_eq!(syntax_kind("sgn 1").2, SyntaxErrorKind::UnexpectedOperand(Opcode::Sgn));
        assert_eq!(syntax_kind("read 1 2").2, SyntaxErrorKind::TrailingToken("2".into()));
    }

    #[test]
    fn test_bad_operand() {
        let (line, text, kind) = syntax_kind("load -10 # negative");
        assert_eq!(line, 1);
        assert_eq!(text, "load -10 # negative");
        assert_eq!(kind, SyntaxErrorKind::InvalidLiteral("-10".into()));
    }
}

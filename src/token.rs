/// Token types for instruction scripts
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Word(String),       // Mnemonic or operand, any run of non-space chars
    Newline,            // Ends an instruction
    Eof,
}

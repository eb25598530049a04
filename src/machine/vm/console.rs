use std::io::{self, BufRead, Write};

/// Buffer lifecycle: `Empty` until a line has been read, `Ready` while the
/// current line still has characters to yield.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum LineState {
    Empty,
    Ready,
}

/// Line-buffered console input.
///
/// Turns a line-oriented input source into a stream of single characters
/// for the `in` instruction. One full line is read per refill and its
/// terminator is yielded like any other character.
pub(super) struct Console {
    state: LineState,
    line: Vec<u8>,
    cursor: usize,
    prompt: bool,
}

impl Console {
    pub(super) fn new() -> Self {
        Self {
            state: LineState::Empty,
            line: Vec::new(),
            cursor: 0,
            prompt: false,
        }
    }

    /// Enables a `"> "` prompt on stderr before each refill. The prompt
    /// stays off the output sink so piped output holds only `out` bytes.
    pub(super) fn set_prompt(&mut self, prompt: bool) {
        self.prompt = prompt;
    }

    /// Returns the next character code, blocking on a line refill when the
    /// current line is exhausted.
    ///
    /// A closed input source (zero bytes read) is reported as
    /// [`io::ErrorKind::UnexpectedEof`] rather than retried.
    pub(super) fn next_char<R: BufRead>(&mut self, input: &mut R) -> io::Result<u16> {
        if self.state == LineState::Empty || self.cursor >= self.line.len() {
            if self.prompt {
                let mut stderr = io::stderr();
                write!(stderr, "> ")?;
                stderr.flush()?;
            }
            self.line.clear();
            if input.read_until(b'\n', &mut self.line)? == 0 {
                self.state = LineState::Empty;
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "input source closed",
                ));
            }
            self.cursor = 0;
            self.state = LineState::Ready;
        }
        let code = self.line[self.cursor];
        self.cursor += 1;
        Ok(code as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn drain<R: BufRead>(console: &mut Console, input: &mut R, count: usize) -> Vec<u16> {
        (0..count)
            .map(|_| console.next_char(input).unwrap())
            .collect()
    }

    #[test]
    fn yields_characters_including_terminator() {
        let mut console = Console::new();
        let mut input = Cursor::new(b"ab\n".to_vec());
        assert_eq!(
            drain(&mut console, &mut input, 3),
            vec![b'a' as u16, b'b' as u16, b'\n' as u16]
        );
    }

    #[test]
    fn refills_across_lines() {
        let mut console = Console::new();
        let mut input = Cursor::new(b"a\nb\n".to_vec());
        assert_eq!(
            drain(&mut console, &mut input, 4),
            vec![b'a' as u16, b'\n' as u16, b'b' as u16, b'\n' as u16]
        );
    }

    #[test]
    fn last_line_without_terminator_is_returned() {
        let mut console = Console::new();
        let mut input = Cursor::new(b"hi".to_vec());
        assert_eq!(drain(&mut console, &mut input, 2), vec![b'h' as u16, b'i' as u16]);
    }

    #[test]
    fn closed_input_is_an_error() {
        let mut console = Console::new();
        let mut input = io::empty();
        let err = console.next_char(&mut input).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn exhausted_line_then_closed_input_is_an_error() {
        let mut console = Console::new();
        let mut input = Cursor::new(b"x\n".to_vec());
        drain(&mut console, &mut input, 2);
        let err = console.next_char(&mut input).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}

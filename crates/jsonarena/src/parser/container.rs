//! Arrays and objects

use tracing::debug;

use super::Session;
use crate::error::{ErrorCode, ParseError, Stage};
use crate::source::ByteSource;
use crate::value::JsonValue;

impl<S: ByteSource> Session<'_, S> {
    pub(super) fn array(&mut self) -> Result<JsonValue, ParseError> {
        self.src.next();
        self.enter(Stage::Array)?;
        let handle = self
            .arena
            .new_array()
            .map_err(|err| self.arena_error(err, Stage::Array))?;

        self.skip_whitespace();
        if self.src.peek() == Some(b']') {
            self.src.next();
        } else {
            loop {
                let item = self.value()?;
                self.arena
                    .push(handle, item)
                    .map_err(|err| self.arena_error(err, Stage::Array))?;

                self.skip_whitespace();
                match self.src.next() {
                    Some(b',') => {}
                    Some(b']') => break,
                    Some(_) => return Err(self.error(ErrorCode::Invalid, Stage::Array)),
                    None => return Err(self.error(ErrorCode::Eof, Stage::Array)),
                }
            }
        }

        self.depth.exit();
        Ok(handle.into())
    }

    pub(super) fn object(&mut self) -> Result<JsonValue, ParseError> {
        self.src.next();
        self.enter(Stage::Object)?;
        let handle = self
            .arena
            .new_object()
            .map_err(|err| self.arena_error(err, Stage::Object))?;

        self.skip_whitespace();
        if self.src.peek() == Some(b'}') {
            self.src.next();
        } else {
            loop {
                self.skip_whitespace();
                match self.src.peek() {
                    Some(b'"') => {}
                    Some(_) => return Err(self.error(ErrorCode::Invalid, Stage::Object)),
                    None => return Err(self.error(ErrorCode::Eof, Stage::Object)),
                }
                let key = self.string()?;

                self.skip_whitespace();
                match self.src.next() {
                    Some(b':') => {}
                    Some(_) => return Err(self.error(ErrorCode::Invalid, Stage::Object)),
                    None => return Err(self.error(ErrorCode::Eof, Stage::Object)),
                }

                let value = self.value()?;
                self.arena
                    .insert_key(handle, key, value)
                    .map_err(|err| self.arena_error(err, Stage::Object))?;

                self.skip_whitespace();
                match self.src.next() {
                    Some(b',') => {}
                    Some(b'}') => break,
                    Some(_) => return Err(self.error(ErrorCode::Invalid, Stage::Object)),
                    None => return Err(self.error(ErrorCode::Eof, Stage::Object)),
                }
            }
        }

        self.depth.exit();
        Ok(handle.into())
    }

    fn enter(&mut self, stage: Stage) -> Result<(), ParseError> {
        let position = self.src.position();
        self.depth.enter(stage, position).inspect_err(|_| {
            debug!(depth = self.depth.current(), position, "Nesting limit reached");
        })
    }
}

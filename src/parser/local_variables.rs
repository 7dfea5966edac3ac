use std::collections::HashMap;

use tracing::trace;

#[derive(Clone, Debug, PartialEq)]
pub struct LocalVar {
    pub name: String,
    /// Distance below `rbp`, in bytes.
    pub offset: usize,
}

/// Flat table of every variable in one compilation unit. Blocks share it.
#[derive(Debug, Default)]
pub(super) struct LocalVariables {
    locals: Vec<LocalVar>,
    index: HashMap<String, usize>,
    last_offset: usize,
}

impl LocalVariables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_last_offset(&self) -> usize {
        self.last_offset
    }

    /// Look `name` up, declaring it in the next 8-byte slot on first use.
    pub fn get_lvar(&mut self, name: &str) -> LocalVar {
        if let Some(&i) = self.index.get(name) {
            return self.locals[i].clone();
        }
        self.last_offset += 8;
        let var = LocalVar {
            name: name.to_string(),
            offset: self.last_offset,
        };
        trace!(name, offset = var.offset, "declared local variable");
        self.index.insert(name.to_string(), self.locals.len());
        self.locals.push(var.clone());
        var
    }

    pub fn into_vec(self) -> Vec<LocalVar> {
        self.locals
    }
}

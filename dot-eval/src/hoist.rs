use dot_library::Value;
use dot_library::foundations::{Env, Func};
use dot_syntax::ast::{DeclKind, Stmt, StmtKind};

/// Declares every `var` in `body` as `undefined` in `frame`, looking into
/// nested blocks and loops but not into nested functions.
pub(crate) fn hoist(frame: &Env, body: &[Stmt]) {
    for statement in body {
        hoist_statement(frame, statement);
    }
}

fn hoist_statement(frame: &Env, statement: &Stmt) {
    match &statement.kind {
        StmtKind::Decl(decl) if decl.kind == DeclKind::Var => {
            for declarator in &decl.declarators {
                // Declaring an existing `var` again is fine and keeps its value.
                let _ = frame.declare(&declarator.name, None, DeclKind::Var);
            }
        }
        StmtKind::If {
            then, otherwise, ..
        } => {
            hoist_statement(frame, then);
            if let Some(otherwise) = otherwise {
                hoist_statement(frame, otherwise);
            }
        }
        StmtKind::For { init, body, .. } => {
            if let Some(init) = init {
                hoist_statement(frame, init);
            }
            hoist_statement(frame, body);
        }
        StmtKind::While { body, .. } => hoist_statement(frame, body),
        StmtKind::Block(statements) => hoist(frame, statements),
        _ => {}
    }
}

/// Binds the function declarations of a statement list before any of its
/// statements run.
pub(crate) fn hoist_functions(env: &Env, statements: &[Stmt]) {
    for statement in statements {
        if let StmtKind::Function(def) = &statement.kind
            && let Some(name) = &def.name
        {
            env.define(name.clone(), Value::Func(Func::closure(def.clone(), env.clone())));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dot_syntax::FileId;

    #[test]
    fn vars_in_blocks_are_hoisted() {
        let program = dot_syntax::parse(
            "if (a) { var x = 1; } for (var i = 0; i < 1; i++) { var y; } function f() { var z; }",
            FileId::new("hoist.dot"),
        )
        .unwrap();

        let frame = Env::global();
        hoist(&frame, &program.body);

        let names = frame.names();
        assert_eq!(names.iter().map(|n| n.as_str()).collect::<Vec<_>>(), ["x", "i", "y"]);
        assert_eq!(frame.lookup("x"), Some(Value::Undefined));
    }
}

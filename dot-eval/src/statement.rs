use crate::vm::FlowEvent;
use crate::{Eval, Machine};
use dot_library::Value;
use dot_library::diag::{At, SourceResult};
use dot_syntax::ast::{Decl, DeclKind, Expr, Stmt, StmtKind};

impl Eval for &Stmt {
    type Output = ();

    fn eval(self, vm: &mut Machine) -> SourceResult<()> {
        match &self.kind {
            StmtKind::Expr(expr) => {
                expr.eval(vm)?;
            }
            StmtKind::Decl(decl) => decl.eval(vm)?,
            StmtKind::If {
                test,
                then,
                otherwise,
            } => {
                if test.eval(vm)?.truthy() {
                    then.as_ref().eval(vm)?;
                } else if let Some(otherwise) = otherwise {
                    otherwise.as_ref().eval(vm)?;
                }
            }
            StmtKind::For {
                init,
                test,
                update,
                body,
            } => vm.in_block(|vm| {
                if let Some(init) = init {
                    init.as_ref().eval(vm)?;
                }
                run_loop(vm, test.as_ref(), update.as_ref(), body)
            })?,
            StmtKind::While { test, body } => run_loop(vm, Some(test), None, body)?,
            StmtKind::Block(statements) => vm.in_block(|vm| vm.run_statements(statements))?,
            StmtKind::Return(value) => {
                let value = match value {
                    Some(expr) => expr.eval(vm)?,
                    None => Value::Undefined,
                };
                vm.flow = Some(FlowEvent::Return(self.span, value));
            }
            StmtKind::Break => vm.flow = Some(FlowEvent::Break(self.span)),
            StmtKind::Continue => vm.flow = Some(FlowEvent::Continue(self.span)),
            // Bound when the enclosing statement list started.
            StmtKind::Function(_) => {}
            StmtKind::Empty => {}
        }
        Ok(())
    }
}

impl Eval for &Decl {
    type Output = ();

    fn eval(self, vm: &mut Machine) -> SourceResult<()> {
        for declarator in &self.declarators {
            let value = match &declarator.init {
                Some(init) => Some(init.eval(vm)?),
                None => None,
            };

            match self.kind {
                DeclKind::Var => {
                    if let Some(value) = value {
                        vm.env
                            .var_scope()
                            .declare(&declarator.name, Some(value), DeclKind::Var)
                            .at(declarator.span)?;
                    }
                }
                kind => vm
                    .env
                    .declare(
                        &declarator.name,
                        Some(value.unwrap_or_default()),
                        kind,
                    )
                    .at(declarator.span)?,
            }
        }
        Ok(())
    }
}

fn run_loop(
    vm: &mut Machine,
    test: Option<&Expr>,
    update: Option<&Expr>,
    body: &Stmt,
) -> SourceResult<()> {
    let flow = vm.flow.take();

    loop {
        if let Some(test) = test
            && !test.eval(vm)?.truthy()
        {
            break;
        }

        body.eval(vm)?;

        match &vm.flow {
            None => {}
            Some(FlowEvent::Break(_)) => {
                vm.flow = None;
                break;
            }
            Some(FlowEvent::Continue(_)) => vm.flow = None,
            Some(FlowEvent::Return(..)) => return Ok(()),
        }

        if let Some(update) = update {
            update.eval(vm)?;
        }
    }

    if let Some(flow) = flow {
        vm.flow = Some(flow);
    }
    Ok(())
}

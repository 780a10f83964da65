//! Lowered program form
//!
//! The same walk as the text generator, producing typed statements instead of
//! text. Defaults, sanitization and operator fallbacks come from the category
//! modules, so the script always means what the display text says.

use std::collections::BTreeSet;

use super::{check_slots, expect_fit, GenerationError, Position};
use crate::categories::logic::{self, ComparisonOp};
use crate::categories::transform::{self, TransformOp};
use crate::categories::{timing, variables};
use crate::core::node::{slot_names, Node, NodeKind, Workspace};

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Text(String),
    Variable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Assign {
        name: String,
        value: Expr,
    },
    If {
        subject: String,
        op: ComparisonOp,
        compare: Expr,
        then_branch: Vec<Statement>,
        else_branch: Vec<Statement>,
    },
    Transform {
        target: String,
        op: TransformOp,
    },
    Delay {
        seconds: f64,
    },
    Print {
        message: Expr,
    },
    /// A value standing alone as a statement
    Evaluate(Expr),
}

/// A lexical item of the emitted text, in source order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Name introduced by `var`
    Declare(&'a str),
    /// Name read by an expression
    Reference(&'a str),
    /// Name both read and written by a transform; `postfix` for `++`/`--`
    Target { name: &'a str, postfix: bool },
    /// Content of a string literal
    Text(&'a str),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    pub statements: Vec<Statement>,
}

impl Script {
    pub fn lower(workspace: &Workspace) -> Result<Self, GenerationError> {
        let mut statements = Vec::new();
        for node in workspace.top_blocks_ordered() {
            match node.kind {
                NodeKind::TriggerStart => {
                    check_slots(node)?;
                    lower_chain(node.next_node(), &mut statements)?;
                }
                NodeKind::ValueNumber | NodeKind::ValueText | NodeKind::ValueVariable => {
                    check_slots(node)?;
                    statements.push(Statement::Evaluate(expr_of(node)?));
                }
                _ => lower_chain(Some(node), &mut statements)?,
            }
        }
        Ok(Self { statements })
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Every name introduced by an assignment, at any depth
    pub fn declared_names(&self) -> BTreeSet<&str> {
        self.tokens()
            .into_iter()
            .filter_map(|token| match token {
                Token::Declare(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    /// Tokens in the order they appear in the emitted text
    pub fn tokens(&self) -> Vec<Token<'_>> {
        let mut tokens = Vec::new();
        let mut stack: Vec<std::slice::Iter<'_, Statement>> = vec![self.statements.iter()];
        while let Some(frame) = stack.last_mut() {
            let Some(statement) = frame.next() else {
                stack.pop();
                continue;
            };
            match statement {
                Statement::Assign { name, value } => {
                    tokens.push(Token::Declare(name));
                    tokens.extend(expr_token(value));
                }
                Statement::If {
                    subject,
                    compare,
                    then_branch,
                    else_branch,
                    ..
                } => {
                    tokens.push(Token::Reference(subject));
                    tokens.extend(expr_token(compare));
                    // Pushed in reverse so the then branch is visited first
                    stack.push(else_branch.iter());
                    stack.push(then_branch.iter());
                }
                Statement::Transform { target, op } => tokens.push(Token::Target {
                    name: target,
                    postfix: op.is_step(),
                }),
                Statement::Delay { .. } => {}
                Statement::Print { message } => tokens.extend(expr_token(message)),
                Statement::Evaluate(expr) => tokens.extend(expr_token(expr)),
            }
        }
        tokens
    }
}

fn expr_token(expr: &Expr) -> Option<Token<'_>> {
    match expr {
        Expr::Number(_) => None,
        Expr::Text(text) => Some(Token::Text(text)),
        Expr::Variable(name) => Some(Token::Reference(name)),
    }
}

fn lower_chain(first: Option<&Node>, out: &mut Vec<Statement>) -> Result<(), GenerationError> {
    let mut current = first;
    let mut head = true;
    while let Some(node) = current {
        if !head {
            expect_fit(node, Position::StatementChain)?;
        }
        head = false;
        check_slots(node)?;
        if let Some(statement) = lower_node(node)? {
            out.push(statement);
        }
        current = node.next_node();
    }
    Ok(())
}

fn lower_node(node: &Node) -> Result<Option<Statement>, GenerationError> {
    let statement = match node.kind {
        NodeKind::TriggerStart => return Ok(None),
        NodeKind::SetVariable => Statement::Assign {
            name: variables::assign_target(node),
            value: slot_expr(node, slot_names::VALUE, Expr::Number(0.0))?,
        },
        NodeKind::ValueNumber | NodeKind::ValueText | NodeKind::ValueVariable => {
            Statement::Evaluate(expr_of(node)?)
        }
        NodeKind::Condition => Statement::If {
            subject: logic::subject(node),
            op: logic::operator(node),
            compare: slot_expr(node, slot_names::COMPARE_VALUE, Expr::Number(0.0))?,
            then_branch: slot_chain(node, slot_names::DO)?,
            else_branch: slot_chain(node, slot_names::ELSE)?,
        },
        NodeKind::Transform => Statement::Transform {
            target: transform::target(node),
            op: transform::operation(node),
        },
        NodeKind::Delay => Statement::Delay {
            seconds: timing::seconds(node),
        },
        NodeKind::Output => Statement::Print {
            message: slot_expr(node, slot_names::MESSAGE, Expr::Text(String::new()))?,
        },
    };
    Ok(Some(statement))
}

fn expr_of(node: &Node) -> Result<Expr, GenerationError> {
    match node.kind {
        NodeKind::ValueNumber => Ok(Expr::Number(variables::number_value(node))),
        NodeKind::ValueText => Ok(Expr::Text(variables::text_value(node))),
        NodeKind::ValueVariable => Ok(Expr::Variable(variables::reference_name(node))),
        _ => Err(GenerationError::Misplaced {
            node_id: node.id.clone(),
            kind: node.kind,
            position: Position::ValueSlot,
        }),
    }
}

fn slot_expr(node: &Node, slot: &str, default: Expr) -> Result<Expr, GenerationError> {
    match node.input(slot) {
        Some(child) => {
            expect_fit(child, Position::ValueSlot)?;
            check_slots(child)?;
            expr_of(child)
        }
        None => Ok(default),
    }
}

fn slot_chain(node: &Node, slot: &str) -> Result<Vec<Statement>, GenerationError> {
    let mut statements = Vec::new();
    if let Some(first) = node.input(slot) {
        expect_fit(first, Position::StatementChain)?;
        lower_chain(Some(first), &mut statements)?;
    }
    Ok(statements)
}

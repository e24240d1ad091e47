use crate::{
    expr::{Arrow, ArrowBody, ArrayLit, Assign, AssignTarget, Binary, Call, Cond, ExprId, Logical,
        Member, Unary},
    lit::{Ident, Lit, LitValue, Name},
    node::NodeId,
    ops::{BinaryOp, LogicalOp, UnaryOp},
    stmt::{Block, DeclKind, ExprStmt, For, FuncDecl, If, Program, Return, StmtId, VarDecl, While},
    tree::SyntaxTree,
};

/// Fluent construction of a [`SyntaxTree`], one method per node kind.
///
/// The builder exists for whatever sits in front of the checker: a parser
/// lowering its concrete syntax, or a test writing a program by hand.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    tree: SyntaxTree,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finishes the tree with a program node over the given body.
    pub fn program(mut self, body: Vec<StmtId>) -> (SyntaxTree, NodeId<Program>) {
        let root = self.tree.insert(Program { body });
        (self.tree, root)
    }

    // -- expressions --

    pub fn num(&mut self, value: f64) -> ExprId {
        self.tree.insert(Lit(LitValue::Num(value))).into()
    }

    pub fn bool(&mut self, value: bool) -> ExprId {
        self.tree.insert(Lit(LitValue::Bool(value))).into()
    }

    pub fn str(&mut self, value: impl Into<String>) -> ExprId {
        self.tree.insert(Lit(LitValue::Str(value.into()))).into()
    }

    pub fn null(&mut self) -> ExprId {
        self.tree.insert(Lit(LitValue::Null)).into()
    }

    pub fn undefined(&mut self) -> ExprId {
        self.tree.insert(Lit(LitValue::Undefined)).into()
    }

    pub fn ident(&mut self, name: impl Into<String>) -> ExprId {
        self.tree.insert(Ident(name.into())).into()
    }

    pub fn unary(&mut self, op: UnaryOp, arg: ExprId) -> ExprId {
        self.tree.insert(Unary { op, arg }).into()
    }

    pub fn binary(&mut self, op: BinaryOp, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.tree.insert(Binary { op, lhs, rhs }).into()
    }

    pub fn logical(&mut self, op: LogicalOp, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.tree.insert(Logical { op, lhs, rhs }).into()
    }

    pub fn call(&mut self, callee: ExprId, args: Vec<ExprId>) -> ExprId {
        self.tree.insert(Call { callee, args }).into()
    }

    pub fn cond(&mut self, test: ExprId, cons: ExprId, alt: ExprId) -> ExprId {
        self.tree.insert(Cond { test, cons, alt }).into()
    }

    pub fn arrow_expr(&mut self, params: &[&str], body: ExprId) -> ExprId {
        let params = self.names(params);
        self.tree
            .insert(Arrow {
                params,
                body: ArrowBody::Expr(body),
            })
            .into()
    }

    pub fn arrow_block(&mut self, params: &[&str], body: NodeId<Block>) -> ExprId {
        let params = self.names(params);
        self.tree
            .insert(Arrow {
                params,
                body: ArrowBody::Block(body),
            })
            .into()
    }

    pub fn array(&mut self, elements: Vec<ExprId>) -> ExprId {
        self.tree.insert(ArrayLit { elements }).into()
    }

    pub fn member(&mut self, object: ExprId, index: ExprId) -> ExprId {
        self.member_node(object, index).into()
    }

    pub fn member_node(&mut self, object: ExprId, index: ExprId) -> NodeId<Member> {
        self.tree.insert(Member { object, index })
    }

    pub fn assign(&mut self, name: impl Into<String>, value: ExprId) -> ExprId {
        let target = AssignTarget::Ident(self.tree.insert(Ident(name.into())));
        self.tree.insert(Assign { target, value }).into()
    }

    pub fn assign_member(&mut self, target: NodeId<Member>, value: ExprId) -> ExprId {
        self.tree
            .insert(Assign {
                target: AssignTarget::Member(target),
                value,
            })
            .into()
    }

    // -- statements --

    pub fn expr_stmt(&mut self, expr: ExprId) -> StmtId {
        self.tree.insert(ExprStmt { expr }).into()
    }

    pub fn const_decl(&mut self, name: impl Into<String>, init: ExprId) -> StmtId {
        self.var_decl(DeclKind::Const, name, init)
    }

    pub fn let_decl(&mut self, name: impl Into<String>, init: ExprId) -> StmtId {
        self.var_decl(DeclKind::Let, name, init)
    }

    pub fn var_decl(&mut self, kind: DeclKind, name: impl Into<String>, init: ExprId) -> StmtId {
        let name = self.name(name);
        self.tree.insert(VarDecl { kind, name, init }).into()
    }

    pub fn func_decl(
        &mut self,
        name: impl Into<String>,
        params: &[&str],
        body: NodeId<Block>,
    ) -> StmtId {
        let name = self.name(name);
        let params = self.names(params);
        self.tree.insert(FuncDecl { name, params, body }).into()
    }

    pub fn ret(&mut self, arg: ExprId) -> StmtId {
        self.tree.insert(Return { arg: Some(arg) }).into()
    }

    pub fn ret_empty(&mut self) -> StmtId {
        self.tree.insert(Return { arg: None }).into()
    }

    pub fn if_stmt(&mut self, test: ExprId, cons: NodeId<Block>, alt: Option<StmtId>) -> StmtId {
        self.tree.insert(If { test, cons, alt }).into()
    }

    pub fn while_stmt(&mut self, test: ExprId, body: NodeId<Block>) -> StmtId {
        self.tree.insert(While { test, body }).into()
    }

    pub fn for_stmt(
        &mut self,
        init: StmtId,
        test: ExprId,
        update: ExprId,
        body: NodeId<Block>,
    ) -> StmtId {
        self.tree
            .insert(For {
                init,
                test,
                update,
                body,
            })
            .into()
    }

    pub fn block(&mut self, stmts: Vec<StmtId>) -> NodeId<Block> {
        self.tree.insert(Block { stmts })
    }

    pub fn block_stmt(&mut self, stmts: Vec<StmtId>) -> StmtId {
        self.block(stmts).into()
    }

    // -- names --

    pub fn name(&mut self, name: impl Into<String>) -> NodeId<Name> {
        self.tree.insert(Name(name.into()))
    }

    fn names(&mut self, names: &[&str]) -> Vec<NodeId<Name>> {
        names.iter().map(|n| self.name(*n)).collect()
    }
}

use log::{debug, trace};
use std::collections::HashSet;

use source_tree::{
    ArrowBody, AssignTarget, Block, DeclKind, ExprId, LitValue, Member, Node, NodeId, Program,
    StmtId, SyntaxTree,
};

use crate::{
    annotate::{Annotations, Typability},
    check::TypeCheckOutput,
    diagnostic::{TypeDiagnostic, TypeDiagnosticKind},
    env::{BindingType, TypeEnv},
    error::TypeFault,
    store::ConstraintStore,
    substitute::{apply, resolve},
    types::{Type, VarSupply},
    unify::add_constraint,
};

// Γ = type environment, τ = term, σ = scheme
//
// Inference runs in three passes: decorate every node with a fresh
// variable, walk the tree emitting equations into the store, then
// substitute solved terms back onto the nodes. A failed equation becomes
// a diagnostic at the rule that emitted it and the walk carries on.

pub struct Typer<'t> {
    tree: &'t SyntaxTree,
    supply: VarSupply,
    store: ConstraintStore,
    meta: Annotations,
    diagnostics: Vec<TypeDiagnostic>,
    cyclic_reported: HashSet<usize>,
}

impl<'t> Typer<'t> {
    pub fn new(tree: &'t SyntaxTree, supply: VarSupply) -> Self {
        Self {
            tree,
            supply,
            store: ConstraintStore::new(),
            meta: Annotations::new(),
            diagnostics: Vec::new(),
            cyclic_reported: HashSet::new(),
        }
    }

    pub fn check(mut self, root: NodeId<Program>, env: &TypeEnv) -> TypeCheckOutput {
        debug!("decorating {} nodes", self.tree.len());
        self.meta = Annotations::decorate(self.tree, &mut self.supply);

        debug!("emitting constraints");
        let body = &self.tree.get(root).body;
        self.infer_scope(root.raw(), body, env, true);

        debug!("resolving {} equations", self.store.len());
        trace!("store:\n{}", self.store);
        self.resolve_all();

        TypeCheckOutput {
            annotations: self.meta,
            diagnostics: self.diagnostics,
        }
    }

    // -- shared helpers --

    fn ty(&self, idx: usize) -> Type {
        self.meta[idx].ty.clone()
    }

    fn constrain(&mut self, lhs: &Type, rhs: &Type) -> Result<(), TypeFault> {
        add_constraint(&mut self.store, lhs, rhs)
    }

    /// The term in canonical form, falling back to plain resolution when
    /// normalisation faults.
    fn applied(&mut self, ty: &Type) -> Type {
        apply(ty, &mut self.store).unwrap_or_else(|_| resolve(ty, &self.store))
    }

    fn report(&mut self, node: usize, kind: TypeDiagnosticKind) {
        self.diagnostics.push(TypeDiagnostic::new(node, kind));
    }

    fn operator(&mut self, env: &TypeEnv, symbol: &str) -> Type {
        env.get(symbol)
            .expect("operator missing from the initial environment")
            .ty
            .instantiate(&mut self.supply)
    }

    /// A display copy of the operator's parameter list.
    fn operator_params(&mut self, env: &TypeEnv, symbol: &str) -> Vec<Type> {
        match self.operator(env, symbol) {
            Type::Func(f) => f.params,
            _ => Vec::new(),
        }
    }

    /// The non-boolean side of a failed test-position equation.
    fn test_received(&mut self, fault: &TypeFault, test: &Type) -> Type {
        match fault {
            TypeFault::CannotUnify { expected, actual } => {
                if *expected == Type::BOOLEAN {
                    actual.clone()
                } else {
                    expected.clone()
                }
            }
            TypeFault::NotAddable { actual, .. } => actual.clone(),
            _ => self.applied(test),
        }
    }

    // -- blocks and statements --

    /// Block rule: clone the environment, pre-bind every declared name to
    /// its raw variable (so recursive and forward references resolve),
    /// infer the declarations, generalise them, then infer the remaining
    /// statements. The block's own type is that of its designated value
    /// statement.
    fn infer_scope(&mut self, node_idx: usize, stmts: &[StmtId], env: &TypeEnv, tail: bool) {
        let mut scope = env.clone();

        for stmt in stmts {
            match *stmt {
                StmtId::VarDecl(id) => {
                    let decl = self.tree.get(id);
                    let name = self.tree.get(decl.name).0.clone();
                    scope.bind(name, BindingType::Mono(self.ty(decl.init.raw())), decl.kind);
                }
                StmtId::FuncDecl(id) => {
                    let decl = self.tree.get(id);
                    let name = self.tree.get(decl.name).0.clone();
                    let raw = self.meta[id.raw()]
                        .func_ty
                        .clone()
                        .expect("function declaration was decorated");
                    scope.bind(name, BindingType::Mono(raw), DeclKind::Const);
                }
                _ => {}
            }
        }

        for stmt in stmts {
            if is_declaration(stmt) {
                self.infer_stmt(*stmt, &scope, false);
            }
        }

        self.generalize_declarations(stmts, &mut scope);

        let designated = designate(self.tree, stmts, tail);

        for stmt in stmts {
            if !is_declaration(stmt) {
                let in_tail = tail && designated == Some(*stmt);
                self.infer_stmt(*stmt, &scope, in_tail);
            }
        }

        let node_t = self.ty(node_idx);
        let value_t = match designated {
            Some(stmt) => self.stmt_value(stmt),
            None => Type::UNDEFINED,
        };
        if let Err(fault) = self.constrain(&node_t, &value_t) {
            self.report(node_idx, TypeDiagnosticKind::InternalTypeError { fault });
        }
    }

    /// End of the declaration pre-pass: each declared name is re-bound to
    /// the scheme of its fully-applied term, exactly once. A cyclic
    /// function declaration is reported and its whole subtree cancelled;
    /// the rest of the block continues.
    fn generalize_declarations(&mut self, stmts: &[StmtId], scope: &mut TypeEnv) {
        for stmt in stmts {
            let (decl_idx, name, raw, kind) = match *stmt {
                StmtId::VarDecl(id) => {
                    let decl = self.tree.get(id);
                    let name = self.tree.get(decl.name).0.clone();
                    (id.raw(), name, self.ty(decl.init.raw()), decl.kind)
                }
                StmtId::FuncDecl(id) => {
                    let decl = self.tree.get(id);
                    let name = self.tree.get(decl.name).0.clone();
                    let raw = self.meta[id.raw()]
                        .func_ty
                        .clone()
                        .expect("function declaration was decorated");
                    (id.raw(), name, raw, DeclKind::Const)
                }
                _ => continue,
            };

            match apply(&raw, &mut self.store) {
                Ok(ty) => {
                    trace!("generalise {name} : {ty}");
                    scope.bind(name, BindingType::generalized(ty), kind);
                }
                Err(fault) if fault.is_cyclic() => {
                    self.report(decl_idx, TypeDiagnosticKind::CyclicReference);
                    self.cyclic_reported.insert(decl_idx);
                    self.mark_untypable_stmt(*stmt);
                }
                Err(fault) => {
                    self.report(decl_idx, TypeDiagnosticKind::InternalTypeError { fault });
                }
            }
        }
    }

    /// The value a designated statement contributes to its block: an
    /// expression statement contributes its expression's type, anything
    /// else its own.
    fn stmt_value(&self, stmt: StmtId) -> Type {
        match stmt {
            StmtId::Expr(id) => self.ty(self.tree.get(id).expr.raw()),
            other => self.ty(other.raw()),
        }
    }

    fn infer_stmt(&mut self, stmt: StmtId, env: &TypeEnv, tail: bool) {
        let result = match stmt {
            StmtId::Expr(id) => self.infer_expr_stmt(id, env),
            StmtId::VarDecl(id) => self.infer_var_decl(id, env),
            StmtId::FuncDecl(id) => self.infer_func_decl(id, env),
            StmtId::Return(id) => self.infer_return(id, env),
            StmtId::If(id) => self.infer_if(id, env, tail),
            StmtId::While(id) => self.infer_while(id, env),
            StmtId::For(id) => self.infer_for(id, env),
            StmtId::Block(id) => {
                let block = self.tree.get(id);
                self.infer_scope(id.raw(), &block.stmts, env, tail);
                Ok(())
            }
        };

        // Faults no dedicated rule claimed end up on the statement.
        if let Err(fault) = result {
            self.report(stmt.raw(), TypeDiagnosticKind::InternalTypeError { fault });
        }
    }

    fn infer_expr_stmt(
        &mut self,
        id: NodeId<source_tree::ExprStmt>,
        env: &TypeEnv,
    ) -> Result<(), TypeFault> {
        let expr = self.tree.get(id).expr;
        self.infer_expr(expr, env)?;

        let node_t = self.ty(id.raw());
        self.constrain(&node_t, &Type::UNDEFINED)
    }

    fn infer_var_decl(
        &mut self,
        id: NodeId<source_tree::VarDecl>,
        env: &TypeEnv,
    ) -> Result<(), TypeFault> {
        let decl = self.tree.get(id);

        self.infer_expr(decl.init, env)?;

        let name_t = self.ty(decl.name.raw());
        let init_t = self.ty(decl.init.raw());
        self.constrain(&name_t, &init_t)?;

        let node_t = self.ty(id.raw());
        self.constrain(&node_t, &Type::UNDEFINED)
    }

    /// Abstraction rule for declarations:
    ///
    /// ```ignore
    /// Γ, x1 : τ1, .., xn : τn ⊢ body : τ'
    /// ---------------------------------------------------
    /// Γ ⊢ function f(x1, .., xn) { body } : (τ1, .., τn) -> τ'
    /// ```
    ///
    /// The declaration itself is a statement, so its own type is
    /// `undefined`; the function type lives in the extra declaration slot.
    fn infer_func_decl(
        &mut self,
        id: NodeId<source_tree::FuncDecl>,
        env: &TypeEnv,
    ) -> Result<(), TypeFault> {
        let decl = self.tree.get(id);

        let mut scope = env.clone();
        for param in &decl.params {
            let name = self.tree.get(*param).0.clone();
            scope.bind(name, BindingType::Mono(self.ty(param.raw())), DeclKind::Let);
        }

        let body = self.tree.get(decl.body);
        self.infer_scope(decl.body.raw(), &body.stmts, &scope, false);

        let params = decl.params.iter().map(|p| self.ty(p.raw())).collect();
        let fn_t = Type::func(params, self.ty(decl.body.raw()));

        let func_var = self.meta[id.raw()]
            .func_ty
            .clone()
            .expect("function declaration was decorated");
        self.constrain(&func_var, &fn_t)?;

        let name_t = self.ty(decl.name.raw());
        self.constrain(&name_t, &func_var)?;

        let node_t = self.ty(id.raw());
        self.constrain(&node_t, &Type::UNDEFINED)
    }

    fn infer_return(
        &mut self,
        id: NodeId<source_tree::Return>,
        env: &TypeEnv,
    ) -> Result<(), TypeFault> {
        let node_t = self.ty(id.raw());

        match self.tree.get(id).arg {
            Some(arg) => {
                self.infer_expr(arg, env)?;
                let arg_t = self.ty(arg.raw());
                self.constrain(&node_t, &arg_t)
            }
            None => self.constrain(&node_t, &Type::UNDEFINED),
        }
    }

    /// The test is constrained to `boolean` before it is inferred, so a
    /// mismatch surfaces while inferring the test and is reported as an
    /// invalid test condition.
    fn infer_test(&mut self, test: ExprId, env: &TypeEnv) -> Result<(), TypeFault> {
        let test_t = self.ty(test.raw());
        self.constrain(&test_t, &Type::BOOLEAN)?;

        if let Err(fault) = self.infer_expr(test, env) {
            if fault.is_cyclic() {
                return Err(fault);
            }
            let received = self.test_received(&fault, &test_t);
            self.report(
                test.raw(),
                TypeDiagnosticKind::InvalidTestCondition { received },
            );
        }

        Ok(())
    }

    fn infer_if(
        &mut self,
        id: NodeId<source_tree::If>,
        env: &TypeEnv,
        tail: bool,
    ) -> Result<(), TypeFault> {
        let stmt = self.tree.get(id);

        self.infer_test(stmt.test, env)?;

        let node_t = self.ty(id.raw());
        let cons_t = self.ty(stmt.cons.raw());
        self.constrain(&node_t, &cons_t)?;

        let cons = self.tree.get(stmt.cons);
        self.infer_scope(stmt.cons.raw(), &cons.stmts, env, tail);

        if let Some(alt) = stmt.alt {
            self.infer_stmt(alt, env, tail);

            let alt_t = self.ty(alt.raw());
            if let Err(fault) = self.constrain(&cons_t, &alt_t) {
                if fault.is_cyclic() {
                    return Err(fault);
                }
                let consequent = self.applied(&cons_t);
                let alternate = self.applied(&alt_t);
                self.report(
                    id.raw(),
                    TypeDiagnosticKind::ConsequentAlternateMismatch {
                        consequent,
                        alternate,
                    },
                );
            }
        }

        Ok(())
    }

    fn infer_while(
        &mut self,
        id: NodeId<source_tree::While>,
        env: &TypeEnv,
    ) -> Result<(), TypeFault> {
        let stmt = self.tree.get(id);

        self.infer_test(stmt.test, env)?;

        let body = self.tree.get(stmt.body);
        self.infer_scope(stmt.body.raw(), &body.stmts, env, false);

        let node_t = self.ty(id.raw());
        let body_t = self.ty(stmt.body.raw());
        self.constrain(&node_t, &body_t)
    }

    /// The init declaration opens its own scope; the declared name is
    /// generalised before the test, update, and body see it.
    fn infer_for(&mut self, id: NodeId<source_tree::For>, env: &TypeEnv) -> Result<(), TypeFault> {
        let stmt = self.tree.get(id);

        let mut scope = env.clone();
        match stmt.init {
            StmtId::VarDecl(decl_id) => {
                let decl = self.tree.get(decl_id);
                let name = self.tree.get(decl.name).0.clone();
                let raw = self.ty(decl.init.raw());

                scope.bind(name.clone(), BindingType::Mono(raw.clone()), decl.kind);
                self.infer_var_decl(decl_id, &scope)?;

                let ty = apply(&raw, &mut self.store)?;
                scope.bind(name, BindingType::generalized(ty), decl.kind);
            }
            other => self.infer_stmt(other, &scope, false),
        }

        self.infer_test(stmt.test, &scope)?;
        self.infer_expr(stmt.update, &scope)?;

        let body = self.tree.get(stmt.body);
        self.infer_scope(stmt.body.raw(), &body.stmts, &scope, false);

        let node_t = self.ty(id.raw());
        let body_t = self.ty(stmt.body.raw());
        self.constrain(&node_t, &body_t)
    }

    // -- expressions --

    fn infer_expr(&mut self, expr: ExprId, env: &TypeEnv) -> Result<(), TypeFault> {
        match expr {
            ExprId::Lit(id) => self.infer_lit(id),
            ExprId::Ident(id) => self.infer_ident(id, env),
            ExprId::Unary(id) => self.infer_unary(id, env),
            ExprId::Binary(id) => self.infer_binary(id, env),
            ExprId::Logical(id) => self.infer_logical(id, env),
            ExprId::Call(id) => self.infer_call(id, env),
            ExprId::Cond(id) => self.infer_cond(id, env),
            ExprId::Arrow(id) => self.infer_arrow(id, env),
            ExprId::ArrayLit(id) => self.infer_array(id, env),
            ExprId::Member(id) => self.infer_member(id, env),
            ExprId::Assign(id) => self.infer_assign(id, env),
        }
    }

    fn infer_lit(&mut self, id: NodeId<source_tree::Lit>) -> Result<(), TypeFault> {
        let lit_t = match &self.tree.get(id).0 {
            LitValue::Bool(_) => Type::BOOLEAN,
            LitValue::Num(_) => Type::NUMBER,
            LitValue::Str(_) => Type::STRING,
            LitValue::Undefined => Type::UNDEFINED,
            // null is the empty list of a yet-unknown element type
            LitValue::Null => Type::list(Type::Var(self.supply.fresh())),
        };

        let node_t = self.ty(id.raw());
        self.constrain(&node_t, &lit_t)
    }

    /// Var rule:
    ///
    /// ```ignore
    /// x : σ ∈ Γ   τ = inst(σ)
    /// -----------------------
    /// Γ ⊢ x : τ
    /// ```
    fn infer_ident(
        &mut self,
        id: NodeId<source_tree::Ident>,
        env: &TypeEnv,
    ) -> Result<(), TypeFault> {
        let name = &self.tree.get(id).0;

        match env.get(name) {
            Some(binding) => {
                let ty = binding.ty.instantiate(&mut self.supply);
                let node_t = self.ty(id.raw());
                self.constrain(&node_t, &ty)
            }
            None => {
                // The variable stays free; checking continues around it.
                let name = name.clone();
                self.report(id.raw(), TypeDiagnosticKind::UndefinedIdentifier { name });
                Ok(())
            }
        }
    }

    /// Application of a predeclared operator:
    /// `(τ_arg1, .., τ_argn) -> τ_node = τ_op`.
    fn infer_operator_app(
        &mut self,
        node_idx: usize,
        symbol: &str,
        args: &[ExprId],
        env: &TypeEnv,
    ) -> Result<(), TypeFault> {
        for arg in args {
            self.infer_expr(*arg, env)?;
        }

        let op_t = self.operator(env, symbol);
        let arg_ts: Vec<Type> = args.iter().map(|a| self.ty(a.raw())).collect();
        let app_t = Type::func(arg_ts.clone(), self.ty(node_idx));

        match self.constrain(&app_t, &op_t) {
            Ok(()) => Ok(()),
            Err(fault) if fault.is_cyclic() => Err(fault),
            Err(_) => {
                let expected = self.operator_params(env, symbol);
                let received = arg_ts.iter().map(|t| self.applied(t)).collect();
                self.report(
                    node_idx,
                    TypeDiagnosticKind::InvalidArgumentTypes {
                        args: args.iter().map(ExprId::raw).collect(),
                        expected,
                        received,
                    },
                );
                Ok(())
            }
        }
    }

    fn infer_unary(
        &mut self,
        id: NodeId<source_tree::Unary>,
        env: &TypeEnv,
    ) -> Result<(), TypeFault> {
        let node = self.tree.get(id);
        self.infer_operator_app(id.raw(), node.op.symbol(), &[node.arg], env)
    }

    fn infer_binary(
        &mut self,
        id: NodeId<source_tree::Binary>,
        env: &TypeEnv,
    ) -> Result<(), TypeFault> {
        let node = self.tree.get(id);
        self.infer_operator_app(id.raw(), node.op.symbol(), &[node.lhs, node.rhs], env)
    }

    fn infer_logical(
        &mut self,
        id: NodeId<source_tree::Logical>,
        env: &TypeEnv,
    ) -> Result<(), TypeFault> {
        let node = self.tree.get(id);
        self.infer_operator_app(id.raw(), node.op.symbol(), &[node.lhs, node.rhs], env)
    }

    /// Application rule:
    ///
    /// ```ignore
    /// Γ ⊢ f : τ_f    Γ ⊢ e_i : τ_i
    /// unify((τ_1, .., τ_n) -> τ', τ_f)
    /// --------------------------------
    /// Γ ⊢ f(e_1, .., e_n) : τ'
    /// ```
    fn infer_call(&mut self, id: NodeId<source_tree::Call>, env: &TypeEnv) -> Result<(), TypeFault> {
        let node = self.tree.get(id);

        self.infer_expr(node.callee, env)?;
        for arg in &node.args {
            self.infer_expr(*arg, env)?;
        }

        let arg_ts: Vec<Type> = node.args.iter().map(|a| self.ty(a.raw())).collect();
        let app_t = Type::func(arg_ts.clone(), self.ty(id.raw()));
        let callee_t = self.ty(node.callee.raw());

        match self.constrain(&app_t, &callee_t) {
            Ok(()) => Ok(()),
            Err(TypeFault::Arity { expected, received }) => {
                self.report(
                    id.raw(),
                    TypeDiagnosticKind::DifferentNumberArguments { expected, received },
                );
                Ok(())
            }
            Err(fault) if fault.is_cyclic() => Err(fault),
            Err(_) => {
                let expected = match self.applied(&callee_t) {
                    Type::Func(f) => f.params,
                    _ => Vec::new(),
                };
                let received = arg_ts.iter().map(|t| self.applied(t)).collect();
                self.report(
                    id.raw(),
                    TypeDiagnosticKind::InvalidArgumentTypes {
                        args: node.args.iter().map(ExprId::raw).collect(),
                        expected,
                        received,
                    },
                );
                Ok(())
            }
        }
    }

    fn infer_cond(&mut self, id: NodeId<source_tree::Cond>, env: &TypeEnv) -> Result<(), TypeFault> {
        let node = self.tree.get(id);

        self.infer_test(node.test, env)?;

        let node_t = self.ty(id.raw());
        let cons_t = self.ty(node.cons.raw());
        self.constrain(&node_t, &cons_t)?;

        self.infer_expr(node.cons, env)?;
        self.infer_expr(node.alt, env)?;

        let alt_t = self.ty(node.alt.raw());
        if let Err(fault) = self.constrain(&cons_t, &alt_t) {
            if fault.is_cyclic() {
                return Err(fault);
            }
            let consequent = self.applied(&cons_t);
            let alternate = self.applied(&alt_t);
            self.report(
                id.raw(),
                TypeDiagnosticKind::ConsequentAlternateMismatch {
                    consequent,
                    alternate,
                },
            );
        }

        Ok(())
    }

    /// Abstraction rule:
    ///
    /// ```ignore
    /// Γ, x1 : τ1, .., xn : τn ⊢ body : τ'
    /// ------------------------------------------
    /// Γ ⊢ (x1, .., xn) => body : (τ1, .., τn) -> τ'
    /// ```
    fn infer_arrow(
        &mut self,
        id: NodeId<source_tree::Arrow>,
        env: &TypeEnv,
    ) -> Result<(), TypeFault> {
        let node = self.tree.get(id);

        let mut scope = env.clone();
        for param in &node.params {
            let name = self.tree.get(*param).0.clone();
            scope.bind(name, BindingType::Mono(self.ty(param.raw())), DeclKind::Let);
        }

        let body_t = match node.body {
            ArrowBody::Expr(expr) => {
                self.infer_expr(expr, &scope)?;
                self.ty(expr.raw())
            }
            ArrowBody::Block(block_id) => {
                let block = self.tree.get(block_id);
                self.infer_scope(block_id.raw(), &block.stmts, &scope, false);
                self.ty(block_id.raw())
            }
        };

        let params = node.params.iter().map(|p| self.ty(p.raw())).collect();
        let fn_t = Type::func(params, body_t);

        let node_t = self.ty(id.raw());
        self.constrain(&node_t, &fn_t)
    }

    /// Every element is constrained against one fresh element type; each
    /// mismatch is reported on the offending element and checking moves on.
    fn infer_array(
        &mut self,
        id: NodeId<source_tree::ArrayLit>,
        env: &TypeEnv,
    ) -> Result<(), TypeFault> {
        let node = self.tree.get(id);

        let el = Type::Var(self.supply.fresh());
        let node_t = self.ty(id.raw());
        self.constrain(&node_t, &Type::array(el.clone()))?;

        for element in &node.elements {
            self.infer_expr(*element, env)?;

            let el_t = self.ty(element.raw());
            if let Err(fault) = self.constrain(&el_t, &el) {
                if fault.is_cyclic() {
                    return Err(fault);
                }
                let array = self.applied(&Type::array(el.clone()));
                let received = self.applied(&el_t);
                self.report(
                    element.raw(),
                    TypeDiagnosticKind::ArrayAssignment { array, received },
                );
            }
        }

        Ok(())
    }

    /// Array indexing: the property must be a number and the object an
    /// array; the expression takes the element type.
    fn infer_member(
        &mut self,
        id: NodeId<Member>,
        env: &TypeEnv,
    ) -> Result<(), TypeFault> {
        let node = self.tree.get(id);

        self.infer_expr(node.object, env)?;
        self.infer_expr(node.index, env)?;

        let index_t = self.ty(node.index.raw());
        if let Err(fault) = self.constrain(&index_t, &Type::NUMBER) {
            if fault.is_cyclic() {
                return Err(fault);
            }
            let received = self.applied(&index_t);
            self.report(
                id.raw(),
                TypeDiagnosticKind::InvalidArrayIndexType { received },
            );
        }

        let el = Type::Var(self.supply.fresh());
        let object_t = self.ty(node.object.raw());
        self.constrain(&object_t, &Type::array(el.clone()))?;

        let node_t = self.ty(id.raw());
        self.constrain(&node_t, &el)
    }

    fn infer_assign(
        &mut self,
        id: NodeId<source_tree::Assign>,
        env: &TypeEnv,
    ) -> Result<(), TypeFault> {
        let node = self.tree.get(id);

        self.infer_expr(node.value, env)?;
        let value_t = self.ty(node.value.raw());

        match node.target {
            AssignTarget::Ident(ident_id) => {
                let name = &self.tree.get(ident_id).0;

                let Some(binding) = env.get(name) else {
                    let name = name.clone();
                    self.report(
                        ident_id.raw(),
                        TypeDiagnosticKind::UndefinedIdentifier { name },
                    );
                    return Ok(());
                };

                if binding.decl == DeclKind::Const {
                    self.report(id.raw(), TypeDiagnosticKind::ReassignConst);
                    return Ok(());
                }

                let lhs_t = binding.ty.instantiate(&mut self.supply);
                let ident_t = self.ty(ident_id.raw());
                self.constrain(&ident_t, &lhs_t)?;

                if let Err(fault) = self.constrain(&value_t, &lhs_t) {
                    if fault.is_cyclic() {
                        return Err(fault);
                    }
                    let expected = self.applied(&lhs_t);
                    let received = self.applied(&value_t);
                    self.report(
                        id.raw(),
                        TypeDiagnosticKind::DifferentAssignment { expected, received },
                    );
                }
            }
            AssignTarget::Member(member_id) => {
                self.infer_member(member_id, env)?;

                let member_t = self.ty(member_id.raw());
                if let Err(fault) = self.constrain(&value_t, &member_t) {
                    if fault.is_cyclic() {
                        return Err(fault);
                    }
                    let object = self.tree.get(member_id).object;
                    let array = {
                        let object_t = self.ty(object.raw());
                        self.applied(&object_t)
                    };
                    let received = self.applied(&value_t);
                    self.report(
                        id.raw(),
                        TypeDiagnosticKind::ArrayAssignment { array, received },
                    );
                }
            }
        }

        let node_t = self.ty(id.raw());
        self.constrain(&node_t, &value_t)
    }

    // -- resolution --

    /// Final pass: every node's variable is replaced by its canonical
    /// form. Cancelled subtrees stay untypable; a cyclic function type is
    /// reported once and keeps its pre-substitution variable.
    fn resolve_all(&mut self) {
        for idx in 0..self.meta.len() {
            if self.meta[idx].typability == Typability::Untypable {
                continue;
            }

            let ty = self.meta[idx].ty.clone();
            match apply(&ty, &mut self.store) {
                Ok(applied) => self.meta[idx].ty = applied,
                Err(fault) => self.report_resolution_fault(idx, fault),
            }

            if let Some(func_ty) = self.meta[idx].func_ty.clone() {
                match apply(&func_ty, &mut self.store) {
                    Ok(applied) => self.meta[idx].func_ty = Some(applied),
                    Err(fault) => self.report_resolution_fault(idx, fault),
                }
            }

            self.meta[idx].typability = Typability::Typed;
        }
    }

    fn report_resolution_fault(&mut self, idx: usize, fault: TypeFault) {
        let is_func_decl = matches!(self.tree.nodes.raw(idx), Node::FuncDecl(_));

        if fault.is_cyclic() && is_func_decl && self.cyclic_reported.insert(idx) {
            self.report(idx, TypeDiagnosticKind::CyclicReference);
        }
    }

    // -- cancellation --

    fn mark_untypable(&mut self, idx: usize) {
        self.meta[idx].typability = Typability::Untypable;
    }

    fn mark_untypable_stmt(&mut self, stmt: StmtId) {
        self.mark_untypable(stmt.raw());

        match stmt {
            StmtId::Expr(id) => {
                let expr = self.tree.get(id).expr;
                self.mark_untypable_expr(expr);
            }
            StmtId::VarDecl(id) => {
                let decl = self.tree.get(id);
                self.mark_untypable(decl.name.raw());
                self.mark_untypable_expr(decl.init);
            }
            StmtId::FuncDecl(id) => {
                let decl = self.tree.get(id);
                self.mark_untypable(decl.name.raw());
                for param in &decl.params {
                    self.mark_untypable(param.raw());
                }
                self.mark_untypable_block(decl.body);
            }
            StmtId::Return(id) => {
                if let Some(arg) = self.tree.get(id).arg {
                    self.mark_untypable_expr(arg);
                }
            }
            StmtId::If(id) => {
                let stmt = self.tree.get(id);
                self.mark_untypable_expr(stmt.test);
                self.mark_untypable_block(stmt.cons);
                if let Some(alt) = stmt.alt {
                    self.mark_untypable_stmt(alt);
                }
            }
            StmtId::While(id) => {
                let stmt = self.tree.get(id);
                self.mark_untypable_expr(stmt.test);
                self.mark_untypable_block(stmt.body);
            }
            StmtId::For(id) => {
                let stmt = self.tree.get(id);
                self.mark_untypable_stmt(stmt.init);
                self.mark_untypable_expr(stmt.test);
                self.mark_untypable_expr(stmt.update);
                self.mark_untypable_block(stmt.body);
            }
            StmtId::Block(id) => self.mark_untypable_block(id),
        }
    }

    fn mark_untypable_block(&mut self, id: NodeId<Block>) {
        self.mark_untypable(id.raw());
        let stmts = self.tree.get(id).stmts.clone();
        for stmt in stmts {
            self.mark_untypable_stmt(stmt);
        }
    }

    fn mark_untypable_expr(&mut self, expr: ExprId) {
        self.mark_untypable(expr.raw());

        match expr {
            ExprId::Lit(_) | ExprId::Ident(_) => {}
            ExprId::Unary(id) => {
                let arg = self.tree.get(id).arg;
                self.mark_untypable_expr(arg);
            }
            ExprId::Binary(id) => {
                let node = self.tree.get(id);
                self.mark_untypable_expr(node.lhs);
                self.mark_untypable_expr(node.rhs);
            }
            ExprId::Logical(id) => {
                let node = self.tree.get(id);
                self.mark_untypable_expr(node.lhs);
                self.mark_untypable_expr(node.rhs);
            }
            ExprId::Call(id) => {
                let node = self.tree.get(id);
                self.mark_untypable_expr(node.callee);
                for arg in &node.args {
                    self.mark_untypable_expr(*arg);
                }
            }
            ExprId::Cond(id) => {
                let node = self.tree.get(id);
                self.mark_untypable_expr(node.test);
                self.mark_untypable_expr(node.cons);
                self.mark_untypable_expr(node.alt);
            }
            ExprId::Arrow(id) => {
                let node = self.tree.get(id);
                for param in &node.params {
                    self.mark_untypable(param.raw());
                }
                match node.body {
                    ArrowBody::Expr(expr) => self.mark_untypable_expr(expr),
                    ArrowBody::Block(block) => self.mark_untypable_block(block),
                }
            }
            ExprId::ArrayLit(id) => {
                let node = self.tree.get(id);
                for element in &node.elements {
                    self.mark_untypable_expr(*element);
                }
            }
            ExprId::Member(id) => self.mark_untypable_member(id),
            ExprId::Assign(id) => {
                let node = self.tree.get(id);
                match node.target {
                    AssignTarget::Ident(ident) => self.mark_untypable(ident.raw()),
                    AssignTarget::Member(member) => self.mark_untypable_member(member),
                }
                self.mark_untypable_expr(node.value);
            }
        }
    }

    fn mark_untypable_member(&mut self, id: NodeId<Member>) {
        self.mark_untypable(id.raw());
        let node = self.tree.get(id);
        self.mark_untypable_expr(node.object);
        self.mark_untypable_expr(node.index);
    }
}

fn is_declaration(stmt: &StmtId) -> bool {
    matches!(stmt, StmtId::VarDecl(_) | StmtId::FuncDecl(_))
}

/// Picks the statement whose type becomes the block's value.
///
/// In a tail value context it is the last value-producing statement; in
/// any other block it is the first return-containing statement, or the
/// last statement when no return occurs.
fn designate(tree: &SyntaxTree, stmts: &[StmtId], tail: bool) -> Option<StmtId> {
    if stmts.is_empty() {
        return None;
    }

    if tail {
        stmts
            .iter()
            .rev()
            .find(|s| is_value_producing(tree, **s))
            .or(stmts.last())
            .copied()
    } else {
        stmts
            .iter()
            .find(|s| contains_return(tree, **s))
            .or(stmts.last())
            .copied()
    }
}

/// Expression statements produce values, as do blocks and ifs that reduce
/// to one.
fn is_value_producing(tree: &SyntaxTree, stmt: StmtId) -> bool {
    match stmt {
        StmtId::Expr(_) => true,
        StmtId::Block(id) => tree
            .get(id)
            .stmts
            .iter()
            .any(|s| is_value_producing(tree, *s)),
        StmtId::If(id) => {
            let stmt = tree.get(id);
            let cons = tree
                .get(stmt.cons)
                .stmts
                .iter()
                .any(|s| is_value_producing(tree, *s));
            cons || stmt
                .alt
                .map_or(false, |alt| is_value_producing(tree, alt))
        }
        _ => false,
    }
}

/// Whether a return statement occurs in the statement, without crossing a
/// function boundary.
fn contains_return(tree: &SyntaxTree, stmt: StmtId) -> bool {
    match stmt {
        StmtId::Return(_) => true,
        StmtId::Block(id) => tree.get(id).stmts.iter().any(|s| contains_return(tree, *s)),
        StmtId::If(id) => {
            let stmt = tree.get(id);
            let cons = tree
                .get(stmt.cons)
                .stmts
                .iter()
                .any(|s| contains_return(tree, *s));
            cons || stmt.alt.map_or(false, |alt| contains_return(tree, alt))
        }
        StmtId::While(id) => {
            let body = tree.get(id).body;
            tree.get(body).stmts.iter().any(|s| contains_return(tree, *s))
        }
        StmtId::For(id) => {
            let body = tree.get(id).body;
            tree.get(body).stmts.iter().any(|s| contains_return(tree, *s))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::type_check;
    use source_tree::{BinaryOp, LogicalOp, TreeBuilder};

    #[test]
    fn adds_two_numbers() {
        let mut b = TreeBuilder::new();

        let five = b.num(5.0);
        let x = b.const_decl("x", five);
        let six = b.num(6.0);
        let y = b.const_decl("y", six);

        let x_ref = b.ident("x");
        let y_ref = b.ident("y");
        let sum = b.binary(BinaryOp::Add, x_ref, y_ref);
        let z = b.const_decl("z", sum);

        let (tree, root) = b.program(vec![x, y, z]);
        let out = type_check(&tree, root);

        assert!(out.is_well_typed(), "{:?}", out.diagnostics);
        assert_eq!(out.annotations[sum.raw()].ty, Type::NUMBER);
    }

    #[test]
    fn rejects_adding_number_and_string() {
        let mut b = TreeBuilder::new();

        let five = b.num(5.0);
        let x = b.const_decl("x", five);
        let bob = b.str("bob");
        let y = b.const_decl("y", bob);

        let x_ref = b.ident("x");
        let y_ref = b.ident("y");
        let sum = b.binary(BinaryOp::Add, x_ref, y_ref);
        let z = b.const_decl("z", sum);

        let (tree, root) = b.program(vec![x, y, z]);
        let out = type_check(&tree, root);

        assert_eq!(out.diagnostics.len(), 1, "{:?}", out.diagnostics);
        assert_eq!(out.diagnostics[0].node, sum.raw());
        match &out.diagnostics[0].kind {
            TypeDiagnosticKind::InvalidArgumentTypes { received, .. } => {
                assert_eq!(received, &[Type::NUMBER, Type::STRING]);
            }
            other => panic!("expected invalid argument types, got {other:?}"),
        }

        assert_eq!(out.annotations[five.raw()].ty, Type::NUMBER);
        assert_eq!(out.annotations[bob.raw()].ty, Type::STRING);
    }

    #[test]
    fn generalises_the_identity_function_across_uses() {
        let mut b = TreeBuilder::new();

        let x_ref = b.ident("x");
        let identity = b.arrow_expr(&["x"], x_ref);
        let f = b.const_decl("f", identity);

        let f1 = b.ident("f");
        let one = b.num(1.0);
        let on_number = b.call(f1, vec![one]);
        let s1 = b.expr_stmt(on_number);

        let f2 = b.ident("f");
        let truth = b.bool(true);
        let on_boolean = b.call(f2, vec![truth]);
        let s2 = b.expr_stmt(on_boolean);

        let (tree, root) = b.program(vec![f, s1, s2]);
        let out = type_check(&tree, root);

        assert!(out.is_well_typed(), "{:?}", out.diagnostics);
        assert_eq!(out.annotations[on_number.raw()].ty, Type::NUMBER);
        assert_eq!(out.annotations[on_boolean.raw()].ty, Type::BOOLEAN);
    }

    #[test]
    fn infers_a_recursive_factorial() {
        let mut b = TreeBuilder::new();

        // function fact(n) { return n === 0 ? 1 : n * fact(n - 1); }
        let n1 = b.ident("n");
        let zero = b.num(0.0);
        let base = b.binary(BinaryOp::Eq, n1, zero);

        let one = b.num(1.0);

        let n2 = b.ident("n");
        let n3 = b.ident("n");
        let one2 = b.num(1.0);
        let minus = b.binary(BinaryOp::Sub, n3, one2);
        let fact_ref = b.ident("fact");
        let recurse = b.call(fact_ref, vec![minus]);
        let step = b.binary(BinaryOp::Mul, n2, recurse);

        let value = b.cond(base, one, step);
        let ret = b.ret(value);
        let body = b.block(vec![ret]);
        let fact = b.func_decl("fact", &["n"], body);

        let (tree, root) = b.program(vec![fact]);
        let out = type_check(&tree, root);

        assert!(out.is_well_typed(), "{:?}", out.diagnostics);
        assert_eq!(out.annotations[fact.raw()].ty, Type::UNDEFINED);
        assert_eq!(
            out.annotations[fact.raw()].func_ty,
            Some(Type::func(vec![Type::NUMBER], Type::NUMBER))
        );
    }

    #[test]
    fn folds_nested_pairs_into_a_list() {
        let mut b = TreeBuilder::new();

        // const p = pair(1, pair(2, null));
        let pair_inner = b.ident("pair");
        let two = b.num(2.0);
        let empty = b.null();
        let inner = b.call(pair_inner, vec![two, empty]);

        let pair_outer = b.ident("pair");
        let one = b.num(1.0);
        let outer = b.call(pair_outer, vec![one, inner]);
        let p = b.const_decl("p", outer);

        let (tree, root) = b.program(vec![p]);
        let out = type_check(&tree, root);

        assert!(out.is_well_typed(), "{:?}", out.diagnostics);
        assert_eq!(
            out.annotations[outer.raw()].ty,
            Type::pair(Type::NUMBER, Type::list(Type::NUMBER))
        );
    }

    #[test]
    fn flags_a_heterogeneous_array_literal() {
        let mut b = TreeBuilder::new();

        let one = b.num(1.0);
        let two = b.num(2.0);
        let stray = b.str("x");
        let array = b.array(vec![one, two, stray]);
        let a = b.const_decl("a", array);

        let (tree, root) = b.program(vec![a]);
        let out = type_check(&tree, root);

        assert_eq!(out.diagnostics.len(), 1, "{:?}", out.diagnostics);
        match &out.diagnostics[0].kind {
            TypeDiagnosticKind::ArrayAssignment { array, received } => {
                assert_eq!(array, &Type::array(Type::NUMBER));
                assert_eq!(received, &Type::STRING);
            }
            other => panic!("expected an array assignment diagnostic, got {other:?}"),
        }

        assert_eq!(out.annotations[array.raw()].ty, Type::array(Type::NUMBER));
    }

    #[test]
    fn the_program_takes_the_last_expression_value() {
        let mut b = TreeBuilder::new();

        let five = b.num(5.0);
        let s1 = b.expr_stmt(five);
        let text = b.str("x");
        let s2 = b.expr_stmt(text);

        let (tree, root) = b.program(vec![s1, s2]);
        let out = type_check(&tree, root);

        assert!(out.is_well_typed(), "{:?}", out.diagnostics);
        assert_eq!(out.annotations[root.raw()].ty, Type::STRING);
    }

    #[test]
    fn a_program_of_declarations_has_no_value() {
        let mut b = TreeBuilder::new();

        let five = b.num(5.0);
        let x = b.const_decl("x", five);

        let (tree, root) = b.program(vec![x]);
        let out = type_check(&tree, root);

        assert!(out.is_well_typed(), "{:?}", out.diagnostics);
        assert_eq!(out.annotations[root.raw()].ty, Type::UNDEFINED);
    }

    #[test]
    fn reports_an_undefined_identifier() {
        let mut b = TreeBuilder::new();

        let y_ref = b.ident("y");
        let s = b.expr_stmt(y_ref);

        let (tree, root) = b.program(vec![s]);
        let out = type_check(&tree, root);

        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.diagnostics[0].node, y_ref.raw());
        assert_eq!(
            out.diagnostics[0].kind,
            TypeDiagnosticKind::UndefinedIdentifier {
                name: "y".to_owned()
            }
        );
        // the identifier's variable stays free
        assert!(matches!(out.annotations[y_ref.raw()].ty, Type::Var(_)));
    }

    #[test]
    fn reports_reassignment_of_a_constant() {
        let mut b = TreeBuilder::new();

        let five = b.num(5.0);
        let x = b.const_decl("x", five);
        let six = b.num(6.0);
        let reassign = b.assign("x", six);
        let s = b.expr_stmt(reassign);

        let (tree, root) = b.program(vec![x, s]);
        let out = type_check(&tree, root);

        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.diagnostics[0].kind, TypeDiagnosticKind::ReassignConst);
    }

    #[test]
    fn reports_mismatched_conditional_branches() {
        let mut b = TreeBuilder::new();

        let test = b.bool(true);
        let one = b.num(1.0);
        let text = b.str("x");
        let value = b.cond(test, one, text);
        let s = b.expr_stmt(value);

        let (tree, root) = b.program(vec![s]);
        let out = type_check(&tree, root);

        assert_eq!(out.diagnostics.len(), 1, "{:?}", out.diagnostics);
        assert_eq!(
            out.diagnostics[0].kind,
            TypeDiagnosticKind::ConsequentAlternateMismatch {
                consequent: Type::NUMBER,
                alternate: Type::STRING,
            }
        );
    }

    #[test]
    fn reports_a_non_boolean_test_condition() {
        let mut b = TreeBuilder::new();

        let one = b.num(1.0);
        let body = b.block(Vec::new());
        let looped = b.while_stmt(one, body);

        let (tree, root) = b.program(vec![looped]);
        let out = type_check(&tree, root);

        assert_eq!(out.diagnostics.len(), 1, "{:?}", out.diagnostics);
        assert_eq!(
            out.diagnostics[0].kind,
            TypeDiagnosticKind::InvalidTestCondition {
                received: Type::NUMBER
            }
        );
    }

    #[test]
    fn reports_a_wrong_argument_count() {
        let mut b = TreeBuilder::new();

        let x_ref = b.ident("x");
        let identity = b.arrow_expr(&["x"], x_ref);
        let f = b.const_decl("f", identity);

        let f_ref = b.ident("f");
        let one = b.num(1.0);
        let two = b.num(2.0);
        let call = b.call(f_ref, vec![one, two]);
        let s = b.expr_stmt(call);

        let (tree, root) = b.program(vec![f, s]);
        let out = type_check(&tree, root);

        assert_eq!(out.diagnostics.len(), 1, "{:?}", out.diagnostics);
        assert_eq!(
            out.diagnostics[0].kind,
            TypeDiagnosticKind::DifferentNumberArguments {
                expected: 1,
                received: 2,
            }
        );
    }

    #[test]
    fn reports_a_cyclic_function_declaration() {
        let mut b = TreeBuilder::new();

        // function f() { return f; }
        let f_ref = b.ident("f");
        let ret = b.ret(f_ref);
        let body = b.block(vec![ret]);
        let f = b.func_decl("f", &[], body);

        let (tree, root) = b.program(vec![f]);
        let out = type_check(&tree, root);

        assert_eq!(out.diagnostics.len(), 1, "{:?}", out.diagnostics);
        assert_eq!(out.diagnostics[0].node, f.raw());
        assert_eq!(out.diagnostics[0].kind, TypeDiagnosticKind::CyclicReference);
        assert_eq!(out.annotations[f.raw()].typability, Typability::Untypable);
    }

    #[test]
    fn indexes_arrays_with_numbers() {
        let mut b = TreeBuilder::new();

        let one = b.num(1.0);
        let array = b.array(vec![one]);
        let a = b.const_decl("a", array);

        let a_ref = b.ident("a");
        let zero = b.num(0.0);
        let indexed = b.member(a_ref, zero);
        let one2 = b.num(1.0);
        let sum = b.binary(BinaryOp::Add, indexed, one2);
        let s = b.expr_stmt(sum);

        let (tree, root) = b.program(vec![a, s]);
        let out = type_check(&tree, root);

        assert!(out.is_well_typed(), "{:?}", out.diagnostics);
        assert_eq!(out.annotations[indexed.raw()].ty, Type::NUMBER);
    }

    #[test]
    fn reports_a_non_numeric_array_index() {
        let mut b = TreeBuilder::new();

        let one = b.num(1.0);
        let array = b.array(vec![one]);
        let a = b.const_decl("a", array);

        let a_ref = b.ident("a");
        let key = b.str("x");
        let indexed = b.member(a_ref, key);
        let s = b.expr_stmt(indexed);

        let (tree, root) = b.program(vec![a, s]);
        let out = type_check(&tree, root);

        assert_eq!(out.diagnostics.len(), 1, "{:?}", out.diagnostics);
        assert_eq!(
            out.diagnostics[0].kind,
            TypeDiagnosticKind::InvalidArrayIndexType {
                received: Type::STRING
            }
        );
    }

    #[test]
    fn logical_operators_pass_their_right_operand_through() {
        let mut b = TreeBuilder::new();

        let truth = b.bool(true);
        let text = b.str("x");
        let and = b.logical(LogicalOp::And, truth, text);
        let s = b.expr_stmt(and);

        let (tree, root) = b.program(vec![s]);
        let out = type_check(&tree, root);

        assert!(out.is_well_typed(), "{:?}", out.diagnostics);
        assert_eq!(out.annotations[and.raw()].ty, Type::STRING);
    }

    #[test]
    fn logical_operators_require_a_boolean_left_operand() {
        let mut b = TreeBuilder::new();

        let one = b.num(1.0);
        let truth = b.bool(true);
        let or = b.logical(LogicalOp::Or, one, truth);
        let s = b.expr_stmt(or);

        let (tree, root) = b.program(vec![s]);
        let out = type_check(&tree, root);

        assert_eq!(out.diagnostics.len(), 1, "{:?}", out.diagnostics);
        assert!(matches!(
            out.diagnostics[0].kind,
            TypeDiagnosticKind::InvalidArgumentTypes { .. }
        ));
    }

    #[test]
    fn comparisons_reject_boolean_operands() {
        let mut b = TreeBuilder::new();

        let lhs = b.bool(true);
        let rhs = b.bool(false);
        let cmp = b.binary(BinaryOp::Lt, lhs, rhs);
        let s = b.expr_stmt(cmp);

        let (tree, root) = b.program(vec![s]);
        let out = type_check(&tree, root);

        assert_eq!(out.diagnostics.len(), 1, "{:?}", out.diagnostics);
        assert!(matches!(
            out.diagnostics[0].kind,
            TypeDiagnosticKind::InvalidArgumentTypes { .. }
        ));
    }

    #[test]
    fn takes_the_head_of_a_built_list() {
        let mut b = TreeBuilder::new();

        let pair_ref = b.ident("pair");
        let one = b.num(1.0);
        let empty = b.null();
        let singleton = b.call(pair_ref, vec![one, empty]);

        let head_ref = b.ident("head");
        let first = b.call(head_ref, vec![singleton]);
        let s = b.expr_stmt(first);

        let (tree, root) = b.program(vec![s]);
        let out = type_check(&tree, root);

        assert!(out.is_well_typed(), "{:?}", out.diagnostics);
        assert_eq!(out.annotations[first.raw()].ty, Type::NUMBER);
    }

    #[test]
    fn checks_assignment_against_the_declared_type() {
        let mut b = TreeBuilder::new();

        let one = b.num(1.0);
        let x = b.let_decl("x", one);
        let text = b.str("a");
        let bad = b.assign("x", text);
        let s1 = b.expr_stmt(bad);
        let two = b.num(2.0);
        let good = b.assign("x", two);
        let s2 = b.expr_stmt(good);

        let (tree, root) = b.program(vec![x, s1, s2]);
        let out = type_check(&tree, root);

        assert_eq!(out.diagnostics.len(), 1, "{:?}", out.diagnostics);
        assert_eq!(
            out.diagnostics[0].kind,
            TypeDiagnosticKind::DifferentAssignment {
                expected: Type::NUMBER,
                received: Type::STRING,
            }
        );
    }

    #[test]
    fn checking_twice_is_deterministic() {
        let build = || {
            let mut b = TreeBuilder::new();

            let five = b.num(5.0);
            let x = b.const_decl("x", five);
            let bob = b.str("bob");
            let y = b.const_decl("y", bob);
            let x_ref = b.ident("x");
            let y_ref = b.ident("y");
            let sum = b.binary(BinaryOp::Add, x_ref, y_ref);
            let z = b.const_decl("z", sum);

            b.program(vec![x, y, z])
        };

        let (tree_a, root_a) = build();
        let (tree_b, root_b) = build();

        let first = type_check(&tree_a, root_a);
        let second = type_check(&tree_b, root_b);

        assert_eq!(first, second);

        // and re-checking the same tree is a fixpoint as well
        let again = type_check(&tree_a, root_a);
        assert_eq!(first, again);
    }

    #[test]
    fn checks_a_counting_loop() {
        let mut b = TreeBuilder::new();

        // for (let i = 0; i < 10; i = i + 1) { i; }
        let zero = b.num(0.0);
        let init = b.let_decl("i", zero);

        let i1 = b.ident("i");
        let ten = b.num(10.0);
        let test = b.binary(BinaryOp::Lt, i1, ten);

        let i2 = b.ident("i");
        let one = b.num(1.0);
        let next = b.binary(BinaryOp::Add, i2, one);
        let update = b.assign("i", next);

        let i3 = b.ident("i");
        let s = b.expr_stmt(i3);
        let body = b.block(vec![s]);
        let looped = b.for_stmt(init, test, update, body);

        let (tree, root) = b.program(vec![looped]);
        let out = type_check(&tree, root);

        assert!(out.is_well_typed(), "{:?}", out.diagnostics);
        assert_eq!(out.annotations[i3.raw()].ty, Type::NUMBER);
    }

    #[test]
    fn infers_an_arrow_function_with_a_block_body() {
        let mut b = TreeBuilder::new();

        // const f = x => { return x + 1; }; f(2);
        let x_ref = b.ident("x");
        let one = b.num(1.0);
        let plus = b.binary(BinaryOp::Add, x_ref, one);
        let ret = b.ret(plus);
        let body = b.block(vec![ret]);
        let lambda = b.arrow_block(&["x"], body);
        let f = b.const_decl("f", lambda);

        let f_ref = b.ident("f");
        let two = b.num(2.0);
        let call = b.call(f_ref, vec![two]);
        let s = b.expr_stmt(call);

        let (tree, root) = b.program(vec![f, s]);
        let out = type_check(&tree, root);

        assert!(out.is_well_typed(), "{:?}", out.diagnostics);
        assert_eq!(out.annotations[call.raw()].ty, Type::NUMBER);
    }

    #[test]
    fn branches_of_an_if_statement_must_agree() {
        let mut b = TreeBuilder::new();

        let test = b.bool(true);
        let one = b.num(1.0);
        let s_then = b.expr_stmt(one);
        let cons = b.block(vec![s_then]);
        let text = b.str("x");
        let s_else = b.expr_stmt(text);
        let alt = b.block_stmt(vec![s_else]);
        let branch = b.if_stmt(test, cons, Some(alt));

        let (tree, root) = b.program(vec![branch]);
        let out = type_check(&tree, root);

        assert_eq!(out.diagnostics.len(), 1, "{:?}", out.diagnostics);
        assert!(matches!(
            out.diagnostics[0].kind,
            TypeDiagnosticKind::ConsequentAlternateMismatch { .. }
        ));
    }
}

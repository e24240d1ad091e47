use std::ops::ControlFlow;

use super::{ArrayType, FuncType, ListType, PairType, Primitive, Type, TypeVar};

pub trait TypeVisitor: Sized {
    type BreakValue;

    fn visit_primitive(&mut self, _primitive: &Primitive) -> ControlFlow<Self::BreakValue> {
        ControlFlow::Continue(())
    }

    fn visit_var(&mut self, _var: &TypeVar) -> ControlFlow<Self::BreakValue> {
        ControlFlow::Continue(())
    }

    fn visit_func(&mut self, func: &FuncType) -> ControlFlow<Self::BreakValue> {
        for param in &func.params {
            self.visit(param)?;
        }
        self.visit(&func.ret)
    }

    fn visit_pair(&mut self, pair: &PairType) -> ControlFlow<Self::BreakValue> {
        self.visit(&pair.head)?;
        self.visit(&pair.tail)
    }

    fn visit_list(&mut self, list: &ListType) -> ControlFlow<Self::BreakValue> {
        self.visit(&list.0)
    }

    fn visit_array(&mut self, array: &ArrayType) -> ControlFlow<Self::BreakValue> {
        self.visit(&array.0)
    }

    fn visit(&mut self, ty: &Type) -> ControlFlow<Self::BreakValue> {
        match ty {
            Type::Primitive(p) => self.visit_primitive(p),
            Type::Var(v) => self.visit_var(v),
            Type::Func(f) => self.visit_func(f),
            Type::Pair(p) => self.visit_pair(p),
            Type::List(l) => self.visit_list(l),
            Type::Array(a) => self.visit_array(a),
        }
    }
}

//! The table of predeclared names every program is checked against.

use source_tree::DeclKind;

use crate::{
    env::{BindingType, TypeEnv},
    types::{Type, TypeScheme, VarKind, VarSupply},
};

const MATH_CONSTANTS: &[&str] = &[
    "Infinity",
    "NaN",
    "math_E",
    "math_LN2",
    "math_LN10",
    "math_LOG2E",
    "math_LOG10E",
    "math_PI",
    "math_SQRT1_2",
    "math_SQRT2",
];

const MATH_UNARY: &[&str] = &[
    "math_abs",
    "math_acos",
    "math_acosh",
    "math_asin",
    "math_asinh",
    "math_atan",
    "math_atanh",
    "math_cbrt",
    "math_ceil",
    "math_clz32",
    "math_cos",
    "math_cosh",
    "math_exp",
    "math_expm1",
    "math_floor",
    "math_fround",
    "math_log",
    "math_log1p",
    "math_log2",
    "math_log10",
    "math_round",
    "math_sign",
    "math_sin",
    "math_sinh",
    "math_sqrt",
    "math_tan",
    "math_tanh",
    "math_trunc",
];

const MATH_BINARY: &[&str] = &["math_atan2", "math_imul", "math_pow"];

// Typed as a bare quantified variable upstream; any call site unifies
// freely against a fresh instantiation.
const MATH_UNTYPED: &[&str] = &["math_hypot", "math_max", "math_min"];

const NULLARY_NUMBER: &[&str] = &["math_random", "runtime", "get_time"];

const PREDICATES: &[&str] = &[
    "is_boolean",
    "is_number",
    "is_string",
    "is_undefined",
    "is_function",
    "is_pair",
    "is_null",
    "is_list",
];

const COMPARISONS: &[&str] = &["===", "!==", "<", "<=", ">", ">="];

const ARITHMETIC: &[&str] = &["-", "*", "/", "%"];

/// Builds the initial environment: mathematical constants, `math_*`
/// functions, pair/list/array builtins, and the operator table. Unary
/// minus lives under the internal name `-_1`.
pub fn initial_env(supply: &mut VarSupply) -> TypeEnv {
    let mut env = TypeEnv::new();

    fn bind(env: &mut TypeEnv, name: &str, ty: BindingType) {
        env.bind(name, ty, DeclKind::Const);
    }

    for name in MATH_CONSTANTS {
        bind(&mut env, name, BindingType::Mono(Type::NUMBER));
    }

    for name in MATH_UNARY {
        bind(
            &mut env,
            name,
            BindingType::Mono(Type::func(vec![Type::NUMBER], Type::NUMBER)),
        );
    }

    for name in MATH_BINARY {
        bind(
            &mut env,
            name,
            BindingType::Mono(Type::func(vec![Type::NUMBER, Type::NUMBER], Type::NUMBER)),
        );
    }

    for name in MATH_UNTYPED {
        let t = Type::Var(supply.fresh());
        bind(&mut env, name, forall(t));
    }

    for name in NULLARY_NUMBER {
        bind(
            &mut env,
            name,
            BindingType::Mono(Type::func(Vec::new(), Type::NUMBER)),
        );
    }

    // pair and list builtins

    let (a, b) = (Type::Var(supply.fresh()), Type::Var(supply.fresh()));
    let pair_t = Type::pair(a.clone(), b.clone());
    bind(&mut env, "pair", forall(Type::func(vec![a, b], pair_t)));

    let (a, b) = (Type::Var(supply.fresh()), Type::Var(supply.fresh()));
    let pair_t = Type::pair(a.clone(), b);
    bind(&mut env, "head", forall(Type::func(vec![pair_t], a)));

    let (a, b) = (Type::Var(supply.fresh()), Type::Var(supply.fresh()));
    let pair_t = Type::pair(a, b.clone());
    bind(&mut env, "tail", forall(Type::func(vec![pair_t], b)));

    for name in PREDICATES {
        let t = Type::Var(supply.fresh());
        bind(&mut env, name, forall(Type::func(vec![t], Type::BOOLEAN)));
    }

    let t = Type::Var(supply.fresh());
    bind(&mut env, "display", forall(Type::func(vec![t.clone()], t)));

    let t = Type::Var(supply.fresh());
    bind(&mut env, "error", forall(Type::func(vec![t.clone()], t)));

    let t = Type::Var(supply.fresh());
    bind(
        &mut env,
        "stringify",
        forall(Type::func(vec![t], Type::STRING)),
    );

    bind(
        &mut env,
        "prompt",
        BindingType::Mono(Type::func(vec![Type::STRING], Type::STRING)),
    );

    let t = Type::Var(supply.fresh());
    bind(
        &mut env,
        "array_length",
        forall(Type::func(vec![Type::array(t)], Type::NUMBER)),
    );

    // operators

    for name in COMPARISONS {
        let a = Type::Var(supply.fresh_kinded(VarKind::Addable));
        bind(
            &mut env,
            name,
            forall(Type::func(vec![a.clone(), a], Type::BOOLEAN)),
        );
    }

    let a = Type::Var(supply.fresh_kinded(VarKind::Addable));
    bind(
        &mut env,
        "+",
        forall(Type::func(vec![a.clone(), a.clone()], a)),
    );

    for name in ARITHMETIC {
        bind(
            &mut env,
            name,
            BindingType::Mono(Type::func(vec![Type::NUMBER, Type::NUMBER], Type::NUMBER)),
        );
    }

    for name in ["&&", "||"] {
        let t = Type::Var(supply.fresh());
        bind(
            &mut env,
            name,
            forall(Type::func(vec![Type::BOOLEAN, t.clone()], t)),
        );
    }

    bind(
        &mut env,
        "!",
        BindingType::Mono(Type::func(vec![Type::BOOLEAN], Type::BOOLEAN)),
    );

    bind(
        &mut env,
        "-_1",
        BindingType::Mono(Type::func(vec![Type::NUMBER], Type::NUMBER)),
    );

    env
}

fn forall(ty: Type) -> BindingType {
    BindingType::Forall(TypeScheme::new(ty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operators_are_predeclared() {
        let mut supply = VarSupply::new();
        let env = initial_env(&mut supply);

        for op in ["+", "-", "-_1", "===", "&&", "||", "!"] {
            assert!(env.contains(op), "missing operator {op}");
        }
    }

    #[test]
    fn plus_instantiates_to_an_addable_binary_function() {
        let mut supply = VarSupply::new();
        let env = initial_env(&mut supply);

        let plus = env.get("+").unwrap().ty.instantiate(&mut supply);
        let func = plus.as_func().expect("a function type");

        assert_eq!(func.arity(), 2);
        assert_eq!(func.params[0], func.params[1]);
        assert_eq!(func.params[0], func.ret);

        let var = func.ret.as_var().expect("a quantified variable");
        assert_eq!(var.kind(), VarKind::Addable);
    }
}

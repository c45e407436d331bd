// ABOUTME: Evaluator — dispatches special forms and applies closures/primitives

use crate::env::Environment;
use crate::error::LispError;
use crate::value::Value;
use std::rc::Rc;

/// Evaluates `expr` under `env`. Self-evaluating literals return themselves;
/// symbols are looked up; lists are dispatched as special forms or, failing
/// that, as ordinary application.
pub fn eval(env: &Rc<Environment>, expr: &Value) -> Result<Value, LispError> {
    match expr {
        Value::Symbol(s) => env.get(s).ok_or_else(|| LispError::unbound_var(s.clone())),
        Value::List(items) => eval_list(env, items, expr),
        Value::DottedList(_, _) => Err(LispError::bad_special_form(expr)),
        Value::String(_)
        | Value::Integer(_)
        | Value::Float(_)
        | Value::Ratio(_)
        | Value::Complex(_)
        | Value::Bool(_)
        | Value::Char(_)
        | Value::Vector(_)
        | Value::Port(_)
        | Value::PrimitiveFunc(_)
        | Value::IOFunc(_)
        | Value::Closure { .. } => Ok(expr.clone()),
    }
}

fn eval_list(env: &Rc<Environment>, items: &[Value], whole: &Value) -> Result<Value, LispError> {
    if items.is_empty() {
        return Err(LispError::bad_special_form(whole));
    }

    if let Value::Symbol(head) = &items[0] {
        match head.as_str() {
            "quote" => return eval_quote(items, whole),
            "if" => return eval_if(env, items, whole),
            "set!" => return eval_set(env, items, whole),
            "define" => return eval_define(env, items, whole),
            "lambda" => return eval_lambda(env, items, whole),
            "cond" => return eval_cond(env, items),
            "load" => return eval_load(env, items, whole),
            _ => {}
        }
    }

    eval_application(env, items)
}

fn eval_quote(items: &[Value], whole: &Value) -> Result<Value, LispError> {
    if items.len() != 2 {
        return Err(LispError::bad_special_form(whole));
    }
    Ok(items[1].clone())
}

fn eval_if(env: &Rc<Environment>, items: &[Value], whole: &Value) -> Result<Value, LispError> {
    if items.len() != 4 {
        return Err(LispError::bad_special_form(whole));
    }
    match eval(env, &items[1])? {
        Value::Bool(false) => eval(env, &items[3]),
        Value::Bool(true) => eval(env, &items[2]),
        other => Err(LispError::type_mismatch("bool", &other)),
    }
}

fn eval_set(env: &Rc<Environment>, items: &[Value], whole: &Value) -> Result<Value, LispError> {
    if items.len() != 3 {
        return Err(LispError::bad_special_form(whole));
    }
    let name = match &items[1] {
        Value::Symbol(s) => s,
        _ => return Err(LispError::bad_special_form(whole)),
    };
    let value = eval(env, &items[2])?;
    env.set(name, value.clone())?;
    Ok(value)
}

fn parse_params(items: &[Value]) -> Result<Vec<String>, LispError> {
    items
        .iter()
        .map(|v| match v {
            Value::Symbol(s) => Ok(s.clone()),
            other => Err(LispError::type_mismatch("symbol", other)),
        })
        .collect()
}

fn eval_define(env: &Rc<Environment>, items: &[Value], whole: &Value) -> Result<Value, LispError> {
    if items.len() < 3 {
        return Err(LispError::bad_special_form(whole));
    }
    match &items[1] {
        Value::Symbol(name) => {
            if items.len() != 3 {
                return Err(LispError::bad_special_form(whole));
            }
            let value = eval(env, &items[2])?;
            env.define(name.clone(), value.clone());
            Ok(value)
        }
        Value::List(sig) => {
            let (name, params) = split_signature(sig, whole)?;
            let closure = make_closure(env, params, None, &items[2..], whole)?;
            env.define(name, closure.clone());
            Ok(closure)
        }
        Value::DottedList(sig, rest) => {
            let (name, params) = split_signature(sig, whole)?;
            let vararg = match rest.as_ref() {
                Value::Symbol(s) => s.clone(),
                _ => return Err(LispError::bad_special_form(whole)),
            };
            let closure = make_closure(env, params, Some(vararg), &items[2..], whole)?;
            env.define(name, closure.clone());
            Ok(closure)
        }
        _ => Err(LispError::bad_special_form(whole)),
    }
}

fn split_signature(sig: &[Value], whole: &Value) -> Result<(String, Vec<Value>), LispError> {
    if sig.is_empty() {
        return Err(LispError::bad_special_form(whole));
    }
    let name = match &sig[0] {
        Value::Symbol(s) => s.clone(),
        _ => return Err(LispError::bad_special_form(whole)),
    };
    Ok((name, sig[1..].to_vec()))
}

fn make_closure(
    env: &Rc<Environment>,
    params: Vec<Value>,
    vararg: Option<String>,
    body: &[Value],
    whole: &Value,
) -> Result<Value, LispError> {
    if body.is_empty() {
        return Err(LispError::bad_special_form(whole));
    }
    Ok(Value::Closure {
        params: Rc::new(parse_params(&params)?),
        vararg,
        body: Rc::new(body.to_vec()),
        env: env.clone(),
    })
}

fn eval_lambda(env: &Rc<Environment>, items: &[Value], whole: &Value) -> Result<Value, LispError> {
    if items.len() < 3 {
        return Err(LispError::bad_special_form(whole));
    }
    let body = &items[2..];
    match &items[1] {
        Value::List(params) => make_closure(env, params.clone(), None, body, whole),
        Value::DottedList(params, rest) => {
            let vararg = match rest.as_ref() {
                Value::Symbol(s) => s.clone(),
                _ => return Err(LispError::bad_special_form(whole)),
            };
            make_closure(env, params.clone(), Some(vararg), body, whole)
        }
        Value::Symbol(rest) => make_closure(env, vec![], Some(rest.clone()), body, whole),
        _ => Err(LispError::bad_special_form(whole)),
    }
}

fn eval_cond(env: &Rc<Environment>, items: &[Value]) -> Result<Value, LispError> {
    for clause in &items[1..] {
        let clause_items = match clause {
            Value::List(v) => v,
            other => return Err(LispError::num_args(2, std::slice::from_ref(other))),
        };
        if clause_items.len() != 2 {
            return Err(LispError::num_args(2, clause_items));
        }
        let test = &clause_items[0];
        let branch = &clause_items[1];
        if matches!(test, Value::Symbol(s) if s == "else") {
            return eval(env, branch);
        }
        match eval(env, test)? {
            Value::Bool(true) => return eval(env, branch),
            Value::Bool(false) => continue,
            other => return Err(LispError::type_mismatch("bool", &other)),
        }
    }
    Err(LispError::Default("Not viable alternative in cond".to_string()))
}

fn eval_load(env: &Rc<Environment>, items: &[Value], whole: &Value) -> Result<Value, LispError> {
    if items.len() != 2 {
        return Err(LispError::bad_special_form(whole));
    }
    let path = match eval(env, &items[1])? {
        Value::String(s) => s,
        other => return Err(LispError::type_mismatch("string", &other)),
    };
    let contents = std::fs::read_to_string(&path)
        .map_err(|e| LispError::Default(format!("could not read {}: {}", path, e)))?;
    let exprs = crate::parser::parse_program(&contents)?;
    let mut result = Value::List(vec![]);
    for expr in &exprs {
        result = eval(env, expr)?;
    }
    Ok(result)
}

fn eval_application(env: &Rc<Environment>, items: &[Value]) -> Result<Value, LispError> {
    let callee = eval(env, &items[0])?;
    let mut args = Vec::with_capacity(items.len() - 1);
    for a in &items[1..] {
        args.push(eval(env, a)?);
    }
    apply(&callee, &args)
}

/// Applies `callee` to `args`. Shared by ordinary application and the
/// `apply` IO primitive.
pub fn apply(callee: &Value, args: &[Value]) -> Result<Value, LispError> {
    match callee {
        Value::PrimitiveFunc(f) => f(args),
        Value::IOFunc(f) => f(args),
        Value::Closure { params, vararg, body, env } => {
            let new_env = match vararg {
                None => {
                    if args.len() != params.len() {
                        return Err(LispError::num_args(params.len(), args));
                    }
                    let bindings = params.iter().cloned().zip(args.iter().cloned()).collect();
                    Environment::extend(env.clone(), bindings)
                }
                Some(vname) => {
                    if args.len() < params.len() {
                        return Err(LispError::num_args(params.len(), args));
                    }
                    let mut bindings: Vec<(String, Value)> = params
                        .iter()
                        .cloned()
                        .zip(args[..params.len()].iter().cloned())
                        .collect();
                    bindings.push((vname.clone(), Value::List(args[params.len()..].to_vec())));
                    Environment::extend(env.clone(), bindings)
                }
            };
            let mut result = Value::List(vec![]);
            for expr in body.iter() {
                result = eval(&new_env, expr)?;
            }
            Ok(result)
        }
        other => Err(LispError::not_function(other)),
    }
}

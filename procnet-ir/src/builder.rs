//! proc builder
//!
//! typed construction of proc node graphs. every method checks its
//! operands, infers the result type and appends one node to the arena;
//! operands must already exist, which keeps the arena topologically
//! ordered.

use ustr::Ustr;

use procnet_bv::BitVec;

use crate::channel::Channel;
use crate::error::Error;
use crate::node::{Node, NodeId, Op};
use crate::process::{Proc, StateElement};
use crate::types::Type;
use crate::value::Value;

pub struct ProcBuilder {
    name: Ustr,
    token: NodeId,
    state: Vec<StateElement>,
    nodes: Vec<Node>,
}

impl ProcBuilder {
    pub fn new(name: impl AsRef<str>) -> Self {
        let mut builder = Self {
            name: Ustr::from(name.as_ref()),
            token: NodeId(0),
            state: Vec::new(),
            nodes: Vec::new(),
        };
        builder.token = builder.push(Op::TokenParam, [], Type::Token, Some(Ustr::from("tok")));
        builder
    }

    pub fn name(&self) -> Ustr {
        self.name
    }

    /// the proc's input token
    pub fn token(&self) -> NodeId {
        self.token
    }

    /// the type of an already built node
    pub fn type_of(&self, id: NodeId) -> Result<&Type, Error> {
        self.nodes
            .get(id.index())
            .map(Node::ty)
            .ok_or(Error::UnknownNode(id, self.name))
    }

    fn push(
        &mut self,
        op: Op,
        operands: impl IntoIterator<Item = NodeId>,
        ty: Type,
        name: Option<Ustr>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(id, op, operands, ty, name));
        id
    }

    fn bits_width(&self, op: &'static str, index: usize, id: NodeId) -> Result<usize, Error> {
        let ty = self.type_of(id)?;
        ty.bit_count().ok_or_else(|| Error::OperandType {
            op,
            index,
            expected: "bits".into(),
            actual: ty.clone(),
        })
    }

    fn expect_type(
        &self,
        op: &'static str,
        index: usize,
        id: NodeId,
        expected: &Type,
    ) -> Result<(), Error> {
        let ty = self.type_of(id)?;
        if ty != expected {
            return Err(Error::OperandType {
                op,
                index,
                expected: expected.to_string(),
                actual: ty.clone(),
            });
        }
        Ok(())
    }

    fn expect_token(&self, op: &'static str, index: usize, id: NodeId) -> Result<(), Error> {
        self.expect_type(op, index, id, &Type::Token)
    }

    fn expect_predicate(&self, op: &'static str, index: usize, id: NodeId) -> Result<(), Error> {
        self.expect_type(op, index, id, &Type::Bits(1))
    }

    fn check_width(width: usize) -> Result<(), Error> {
        if width > BitVec::MAX_BITS {
            Err(Error::WidthTooLarge(width))
        } else {
            Ok(())
        }
    }

    pub fn state_element(&mut self, name: impl AsRef<str>, init: Value) -> Result<NodeId, Error> {
        let ty = init.ty();
        if ty.contains_token() {
            return Err(Error::invalid(
                "state_read",
                format!("state element `{}` cannot hold a token", name.as_ref()),
            ));
        }
        let name = Ustr::from(name.as_ref());
        let index = self.state.len();
        self.state.push(StateElement::new(name, init));
        Ok(self.push(Op::StateRead(index), [], ty, Some(name)))
    }

    pub fn literal(&mut self, value: Value) -> NodeId {
        let ty = value.ty();
        self.push(Op::Literal(value), [], ty, None)
    }

    pub fn identity(&mut self, operand: NodeId) -> Result<NodeId, Error> {
        let ty = self.type_of(operand)?.clone();
        Ok(self.push(Op::Identity, [operand], ty, None))
    }

    fn binary_bits(&mut self, op: Op, lhs: NodeId, rhs: NodeId) -> Result<NodeId, Error> {
        let mnemonic = op.mnemonic();
        let width = self.bits_width(mnemonic, 0, lhs)?;
        self.expect_type(mnemonic, 1, rhs, &Type::Bits(width))?;
        Ok(self.push(op, [lhs, rhs], Type::Bits(width), None))
    }

    pub fn add(&mut self, lhs: NodeId, rhs: NodeId) -> Result<NodeId, Error> {
        self.binary_bits(Op::Add, lhs, rhs)
    }

    pub fn subtract(&mut self, lhs: NodeId, rhs: NodeId) -> Result<NodeId, Error> {
        self.binary_bits(Op::Sub, lhs, rhs)
    }

    pub fn umul(&mut self, lhs: NodeId, rhs: NodeId) -> Result<NodeId, Error> {
        self.binary_bits(Op::UMul, lhs, rhs)
    }

    pub fn smul(&mut self, lhs: NodeId, rhs: NodeId) -> Result<NodeId, Error> {
        self.binary_bits(Op::SMul, lhs, rhs)
    }

    pub fn udiv(&mut self, lhs: NodeId, rhs: NodeId) -> Result<NodeId, Error> {
        self.binary_bits(Op::UDiv, lhs, rhs)
    }

    pub fn sdiv(&mut self, lhs: NodeId, rhs: NodeId) -> Result<NodeId, Error> {
        self.binary_bits(Op::SDiv, lhs, rhs)
    }

    pub fn umod(&mut self, lhs: NodeId, rhs: NodeId) -> Result<NodeId, Error> {
        self.binary_bits(Op::UMod, lhs, rhs)
    }

    pub fn smod(&mut self, lhs: NodeId, rhs: NodeId) -> Result<NodeId, Error> {
        self.binary_bits(Op::SMod, lhs, rhs)
    }

    fn unary_bits(&mut self, op: Op, operand: NodeId) -> Result<NodeId, Error> {
        let width = self.bits_width(op.mnemonic(), 0, operand)?;
        Ok(self.push(op, [operand], Type::Bits(width), None))
    }

    pub fn negate(&mut self, operand: NodeId) -> Result<NodeId, Error> {
        self.unary_bits(Op::Neg, operand)
    }

    pub fn not(&mut self, operand: NodeId) -> Result<NodeId, Error> {
        self.unary_bits(Op::Not, operand)
    }

    fn nary_bits(&mut self, op: Op, operands: &[NodeId]) -> Result<NodeId, Error> {
        let mnemonic = op.mnemonic();
        let first = *operands
            .first()
            .ok_or_else(|| Error::invalid(mnemonic, "expected at least one operand"))?;
        let width = self.bits_width(mnemonic, 0, first)?;
        for (index, operand) in operands.iter().enumerate().skip(1) {
            self.expect_type(mnemonic, index, *operand, &Type::Bits(width))?;
        }
        Ok(self.push(op, operands.iter().copied(), Type::Bits(width), None))
    }

    pub fn and(&mut self, operands: &[NodeId]) -> Result<NodeId, Error> {
        self.nary_bits(Op::And, operands)
    }

    pub fn or(&mut self, operands: &[NodeId]) -> Result<NodeId, Error> {
        self.nary_bits(Op::Or, operands)
    }

    pub fn xor(&mut self, operands: &[NodeId]) -> Result<NodeId, Error> {
        self.nary_bits(Op::Xor, operands)
    }

    fn reduce(&mut self, op: Op, operand: NodeId) -> Result<NodeId, Error> {
        self.bits_width(op.mnemonic(), 0, operand)?;
        Ok(self.push(op, [operand], Type::Bits(1), None))
    }

    pub fn and_reduce(&mut self, operand: NodeId) -> Result<NodeId, Error> {
        self.reduce(Op::AndReduce, operand)
    }

    pub fn or_reduce(&mut self, operand: NodeId) -> Result<NodeId, Error> {
        self.reduce(Op::OrReduce, operand)
    }

    pub fn xor_reduce(&mut self, operand: NodeId) -> Result<NodeId, Error> {
        self.reduce(Op::XorReduce, operand)
    }

    fn shift(&mut self, op: Op, operand: NodeId, amount: NodeId) -> Result<NodeId, Error> {
        let mnemonic = op.mnemonic();
        let width = self.bits_width(mnemonic, 0, operand)?;
        self.bits_width(mnemonic, 1, amount)?;
        Ok(self.push(op, [operand, amount], Type::Bits(width), None))
    }

    pub fn shll(&mut self, operand: NodeId, amount: NodeId) -> Result<NodeId, Error> {
        self.shift(Op::Shll, operand, amount)
    }

    pub fn shrl(&mut self, operand: NodeId, amount: NodeId) -> Result<NodeId, Error> {
        self.shift(Op::Shrl, operand, amount)
    }

    pub fn shra(&mut self, operand: NodeId, amount: NodeId) -> Result<NodeId, Error> {
        self.shift(Op::Shra, operand, amount)
    }

    fn equality(&mut self, op: Op, lhs: NodeId, rhs: NodeId) -> Result<NodeId, Error> {
        let mnemonic = op.mnemonic();
        let ty = self.type_of(lhs)?.clone();
        if ty.contains_token() {
            return Err(Error::OperandType {
                op: mnemonic,
                index: 0,
                expected: "a data type".into(),
                actual: ty,
            });
        }
        self.expect_type(mnemonic, 1, rhs, &ty)?;
        Ok(self.push(op, [lhs, rhs], Type::Bits(1), None))
    }

    pub fn eq(&mut self, lhs: NodeId, rhs: NodeId) -> Result<NodeId, Error> {
        self.equality(Op::Eq, lhs, rhs)
    }

    pub fn ne(&mut self, lhs: NodeId, rhs: NodeId) -> Result<NodeId, Error> {
        self.equality(Op::Ne, lhs, rhs)
    }

    /// ordered comparison; `op` must be one of the unsigned or signed
    /// comparison operators
    pub fn compare(&mut self, op: Op, lhs: NodeId, rhs: NodeId) -> Result<NodeId, Error> {
        match op {
            Op::ULt | Op::ULe | Op::UGt | Op::UGe | Op::SLt | Op::SLe | Op::SGt | Op::SGe => (),
            _ => return Err(Error::invalid(op.mnemonic(), "not an ordered comparison")),
        }
        let mnemonic = op.mnemonic();
        let width = self.bits_width(mnemonic, 0, lhs)?;
        self.expect_type(mnemonic, 1, rhs, &Type::Bits(width))?;
        Ok(self.push(op, [lhs, rhs], Type::Bits(1), None))
    }

    pub fn ult(&mut self, lhs: NodeId, rhs: NodeId) -> Result<NodeId, Error> {
        self.compare(Op::ULt, lhs, rhs)
    }

    pub fn slt(&mut self, lhs: NodeId, rhs: NodeId) -> Result<NodeId, Error> {
        self.compare(Op::SLt, lhs, rhs)
    }

    fn extend(&mut self, op: Op, operand: NodeId, width: usize) -> Result<NodeId, Error> {
        let mnemonic = op.mnemonic();
        let from = self.bits_width(mnemonic, 0, operand)?;
        Self::check_width(width)?;
        if width < from {
            return Err(Error::invalid(
                mnemonic,
                format!("cannot extend bits[{}] to bits[{}]", from, width),
            ));
        }
        Ok(self.push(op, [operand], Type::Bits(width), None))
    }

    pub fn zero_ext(&mut self, operand: NodeId, width: usize) -> Result<NodeId, Error> {
        self.extend(Op::ZeroExt, operand, width)
    }

    pub fn sign_ext(&mut self, operand: NodeId, width: usize) -> Result<NodeId, Error> {
        self.extend(Op::SignExt, operand, width)
    }

    pub fn bit_slice(&mut self, operand: NodeId, start: usize, width: usize) -> Result<NodeId, Error> {
        let from = self.bits_width("bit_slice", 0, operand)?;
        if start + width > from {
            return Err(Error::invalid(
                "bit_slice",
                format!("slice [{}, {}) out of range for bits[{}]", start, start + width, from),
            ));
        }
        Ok(self.push(Op::BitSlice { start, width }, [operand], Type::Bits(width), None))
    }

    /// concatenation; the first operand ends up in the most significant bits
    pub fn concat(&mut self, operands: &[NodeId]) -> Result<NodeId, Error> {
        let mut width = 0;
        for (index, operand) in operands.iter().enumerate() {
            width += self.bits_width("concat", index, *operand)?;
        }
        Self::check_width(width)?;
        Ok(self.push(Op::Concat, operands.iter().copied(), Type::Bits(width), None))
    }

    /// selects `cases[selector]`, or `default` when the selector is out of
    /// range. without a default the cases must cover every selector value.
    pub fn select(
        &mut self,
        selector: NodeId,
        cases: &[NodeId],
        default: Option<NodeId>,
    ) -> Result<NodeId, Error> {
        let selector_width = self.bits_width("sel", 0, selector)?;
        let first = *cases
            .first()
            .ok_or_else(|| Error::invalid("sel", "expected at least one case"))?;
        let ty = self.type_of(first)?.clone();
        for (index, case) in cases.iter().enumerate().skip(1) {
            self.expect_type("sel", index + 1, *case, &ty)?;
        }
        if let Some(default) = default {
            self.expect_type("sel", cases.len() + 1, default, &ty)?;
        }

        let reachable = 1u128.checked_shl(selector_width as u32);
        match (reachable, default) {
            (Some(reachable), Some(_)) if cases.len() as u128 >= reachable => {
                return Err(Error::invalid(
                    "sel",
                    format!(
                        "default is unreachable with {} cases and a {}-bit selector",
                        cases.len(),
                        selector_width
                    ),
                ))
            }
            (Some(reachable), None) if cases.len() as u128 != reachable => {
                return Err(Error::invalid(
                    "sel",
                    format!(
                        "{} cases do not cover a {}-bit selector and no default is given",
                        cases.len(),
                        selector_width
                    ),
                ))
            }
            (None, None) => {
                return Err(Error::invalid("sel", "a default is required for wide selectors"))
            }
            _ => (),
        }

        let operands = std::iter::once(selector)
            .chain(cases.iter().copied())
            .chain(default);
        Ok(self.push(
            Op::Select {
                has_default: default.is_some(),
            },
            operands,
            ty,
            None,
        ))
    }

    pub fn tuple(&mut self, elements: &[NodeId]) -> Result<NodeId, Error> {
        let types = elements
            .iter()
            .map(|id| self.type_of(*id).cloned())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.push(Op::Tuple, elements.iter().copied(), Type::Tuple(types), None))
    }

    pub fn tuple_index(&mut self, tuple: NodeId, index: usize) -> Result<NodeId, Error> {
        let ty = self.type_of(tuple)?;
        let elements = ty.tuple_elements().ok_or_else(|| Error::OperandType {
            op: "tuple_index",
            index: 0,
            expected: "a tuple".into(),
            actual: ty.clone(),
        })?;
        let element = elements.get(index).cloned().ok_or_else(|| {
            Error::invalid(
                "tuple_index",
                format!("index {} out of range for {}", index, ty),
            )
        })?;
        Ok(self.push(Op::TupleIndex(index), [tuple], element, None))
    }

    pub fn array(&mut self, elements: &[NodeId]) -> Result<NodeId, Error> {
        let first = *elements.first().ok_or(Error::EmptyArray)?;
        let ty = self.type_of(first)?.clone();
        for element in elements.iter().skip(1) {
            let other = self.type_of(*element)?;
            if *other != ty {
                return Err(Error::HeterogeneousArray(ty, other.clone()));
            }
        }
        Ok(self.push(
            Op::Array,
            elements.iter().copied(),
            Type::array(ty, elements.len()),
            None,
        ))
    }

    /// indexes an array; out of range indices read the last element
    pub fn array_index(&mut self, array: NodeId, index: NodeId) -> Result<NodeId, Error> {
        let ty = self.type_of(array)?;
        let (element, _) = ty.array_element().ok_or_else(|| Error::OperandType {
            op: "array_index",
            index: 0,
            expected: "an array".into(),
            actual: ty.clone(),
        })?;
        let element = element.clone();
        self.bits_width("array_index", 1, index)?;
        Ok(self.push(Op::ArrayIndex, [array, index], element, None))
    }

    /// replaces one element; out of range indices leave the array unchanged
    pub fn array_update(
        &mut self,
        array: NodeId,
        value: NodeId,
        index: NodeId,
    ) -> Result<NodeId, Error> {
        let ty = self.type_of(array)?.clone();
        let (element, _) = ty.array_element().ok_or_else(|| Error::OperandType {
            op: "array_update",
            index: 0,
            expected: "an array".into(),
            actual: ty.clone(),
        })?;
        self.expect_type("array_update", 1, value, element)?;
        self.bits_width("array_update", 2, index)?;
        Ok(self.push(Op::ArrayUpdate, [array, value, index], ty, None))
    }

    pub fn after_all(&mut self, tokens: &[NodeId]) -> Result<NodeId, Error> {
        for (index, token) in tokens.iter().enumerate() {
            self.expect_token("after_all", index, *token)?;
        }
        Ok(self.push(Op::AfterAll, tokens.iter().copied(), Type::Token, None))
    }

    pub fn send(&mut self, channel: &Channel, token: NodeId, data: NodeId) -> Result<NodeId, Error> {
        self.expect_token("send", 0, token)?;
        self.expect_type("send", 1, data, channel.ty())?;
        Ok(self.push(Op::Send(channel.id()), [token, data], Type::Token, None))
    }

    pub fn send_if(
        &mut self,
        channel: &Channel,
        token: NodeId,
        predicate: NodeId,
        data: NodeId,
    ) -> Result<NodeId, Error> {
        self.expect_token("send_if", 0, token)?;
        self.expect_predicate("send_if", 1, predicate)?;
        self.expect_type("send_if", 2, data, channel.ty())?;
        Ok(self.push(
            Op::SendIf(channel.id()),
            [token, predicate, data],
            Type::Token,
            None,
        ))
    }

    /// produces a `(token, data)` tuple
    pub fn receive(&mut self, channel: &Channel, token: NodeId) -> Result<NodeId, Error> {
        self.expect_token("receive", 0, token)?;
        let ty = Type::tuple([Type::Token, channel.ty().clone()]);
        Ok(self.push(Op::Receive(channel.id()), [token], ty, None))
    }

    /// produces a `(token, data)` tuple; data is the channel type's zero
    /// value when the predicate is false
    pub fn receive_if(
        &mut self,
        channel: &Channel,
        token: NodeId,
        predicate: NodeId,
    ) -> Result<NodeId, Error> {
        self.expect_token("receive_if", 0, token)?;
        self.expect_predicate("receive_if", 1, predicate)?;
        let ty = Type::tuple([Type::Token, channel.ty().clone()]);
        Ok(self.push(Op::ReceiveIf(channel.id()), [token, predicate], ty, None))
    }

    pub fn build(self, next_token: NodeId, next_state: &[NodeId]) -> Result<Proc, Error> {
        self.expect_token("next", 0, next_token)?;

        if next_state.len() != self.state.len() {
            return Err(Error::InvalidNextState {
                proc: self.name,
                reason: format!(
                    "expected {} values, got {}",
                    self.state.len(),
                    next_state.len()
                ),
            });
        }
        for (element, id) in self.state.iter().zip(next_state.iter()) {
            let ty = self.type_of(*id)?;
            if ty != element.ty() {
                return Err(Error::InvalidNextState {
                    proc: self.name,
                    reason: format!(
                        "`{}` has type {}, but node {} has type {}",
                        element.name(),
                        element.ty(),
                        id,
                        ty
                    ),
                });
            }
        }

        Ok(Proc::new(
            self.name,
            self.token,
            self.state,
            self.nodes,
            next_token,
            next_state.to_vec(),
        ))
    }
}

//! 作业状态表的过滤表达式
//!
//! ```text
//! ExitCode != 0 and node_type == "PAYLOAD"
//! not (node_status == 'Done' or worker_node == None)
//! ```
//!
//! 比较运算为 `== != < <= > >=`，一侧是列名，另一侧是字面量
//! （整数、浮点数、带引号的字符串、`True`/`False`、`None`/`null`）。
//! 逻辑运算支持 `and`/`&&`、`or`/`||`、`not`/`!` 以及括号。

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use condor_monitor_core::models::JobStatusRow;
use condor_monitor_core::{MonitorError, MonitorResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    JobId,
    Node,
    NodeStatus,
    ExitCode,
    ExitBySignal,
    NodeType,
    WorkerNode,
    JobLabel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Integer,
    Text,
    Boolean,
}

impl Column {
    pub fn from_name(name: &str) -> Option<Self> {
        let column = match name {
            "job_id" => Column::JobId,
            "node" => Column::Node,
            "node_status" => Column::NodeStatus,
            "exit_code" | "ExitCode" => Column::ExitCode,
            "exit_by_signal" | "ExitBySignal" => Column::ExitBySignal,
            "node_type" | "wms_node_type" => Column::NodeType,
            "worker_node" => Column::WorkerNode,
            "job_label" | "bps_job_label" => Column::JobLabel,
            _ => return None,
        };
        Some(column)
    }

    fn kind(self) -> ColumnKind {
        match self {
            Column::ExitCode => ColumnKind::Integer,
            Column::ExitBySignal => ColumnKind::Boolean,
            _ => ColumnKind::Text,
        }
    }

    fn cell(self, row: &JobStatusRow) -> Cell<'_> {
        match self {
            Column::JobId => Cell::Text(&row.job_id),
            Column::Node => Cell::Text(&row.node),
            Column::NodeStatus => Cell::Text(&row.node_status),
            Column::ExitCode => Cell::Integer(row.exit_code),
            Column::ExitBySignal => row.exit_by_signal.map_or(Cell::Null, Cell::Boolean),
            Column::NodeType => Cell::Text(&row.node_type),
            Column::WorkerNode => row.worker_node.as_deref().map_or(Cell::Null, Cell::Text),
            Column::JobLabel => Cell::Text(&row.job_label),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Cell<'a> {
    Integer(i64),
    Text(&'a str),
    Boolean(bool),
    Null,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
    Null,
}

impl Literal {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Literal::Integer(i) => Some(*i as f64),
            Literal::Float(f) => Some(*f),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    /// `1 < exit_code` 等价于 `exit_code > 1`
    fn flipped(self) -> Self {
        match self {
            CmpOp::Lt => CmpOp::Gt,
            CmpOp::Le => CmpOp::Ge,
            CmpOp::Gt => CmpOp::Lt,
            CmpOp::Ge => CmpOp::Le,
            other => other,
        }
    }

    fn is_equality(self) -> bool {
        matches!(self, CmpOp::Eq | CmpOp::Ne)
    }

    fn accepts(self, ordering: Option<Ordering>) -> bool {
        match self {
            CmpOp::Eq => ordering == Some(Ordering::Equal),
            CmpOp::Ne => ordering != Some(Ordering::Equal),
            CmpOp::Lt => ordering == Some(Ordering::Less),
            CmpOp::Le => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
            CmpOp::Gt => ordering == Some(Ordering::Greater),
            CmpOp::Ge => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
        }
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        };
        f.write_str(op)
    }
}

/// 解析后的过滤表达式
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Compare {
        column: Column,
        op: CmpOp,
        value: Literal,
    },
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn parse(input: &str) -> MonitorResult<Self> {
        let tokens = tokenize(input)?;
        let mut parser = Parser {
            tokens,
            pos: 0,
            depth: 0,
            comparisons: 0,
        };
        let predicate = parser.or_expr()?;
        match parser.peek() {
            None => Ok(predicate),
            Some(token) => Err(MonitorError::invalid_query(format!(
                "表达式末尾有多余内容: {token:?}"
            ))),
        }
    }

    pub fn matches(&self, row: &JobStatusRow) -> bool {
        match self {
            Predicate::Compare { column, op, value } => {
                op.accepts(compare(column.cell(row), value))
            }
            Predicate::And(lhs, rhs) => lhs.matches(row) && rhs.matches(row),
            Predicate::Or(lhs, rhs) => lhs.matches(row) || rhs.matches(row),
            Predicate::Not(inner) => !inner.matches(row),
        }
    }
}

impl FromStr for Predicate {
    type Err = MonitorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Predicate::parse(s)
    }
}

fn compare(cell: Cell<'_>, value: &Literal) -> Option<Ordering> {
    match (cell, value) {
        (Cell::Integer(a), Literal::Integer(b)) => Some(a.cmp(b)),
        (Cell::Integer(a), Literal::Float(b)) => (a as f64).partial_cmp(b),
        (Cell::Text(a), Literal::Text(b)) => Some(a.cmp(b.as_str())),
        // 作业ID是 "142.0" 这样的字符串，与数字比较时按数值比较
        (Cell::Text(a), literal) => {
            let b = literal.as_f64()?;
            a.trim().parse::<f64>().ok()?.partial_cmp(&b)
        }
        (Cell::Boolean(a), Literal::Boolean(b)) => Some(a.cmp(b)),
        (Cell::Null, Literal::Null) => Some(Ordering::Equal),
        _ => None,
    }
}

fn check_operands(column: Column, op: CmpOp, value: &Literal) -> MonitorResult<()> {
    let compatible = match (column.kind(), value) {
        (_, Literal::Null) => op.is_equality(),
        (ColumnKind::Integer, Literal::Integer(_) | Literal::Float(_)) => true,
        (ColumnKind::Text, Literal::Text(_)) => true,
        (ColumnKind::Text, Literal::Integer(_) | Literal::Float(_)) => column == Column::JobId,
        (ColumnKind::Boolean, Literal::Boolean(_)) => op.is_equality(),
        _ => false,
    };
    if compatible {
        Ok(())
    } else {
        Err(MonitorError::invalid_query(format!(
            "列 {column:?} 不能与 {value:?} 做 {op} 比较"
        )))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Literal(Literal),
    Op(CmpOp),
    And,
    Or,
    Not,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> MonitorResult<Vec<Token>> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        match c {
            c if c.is_whitespace() => {
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '=' if next == Some('=') => {
                tokens.push(Token::Op(CmpOp::Eq));
                i += 2;
            }
            '!' if next == Some('=') => {
                tokens.push(Token::Op(CmpOp::Ne));
                i += 2;
            }
            '!' => {
                tokens.push(Token::Not);
                i += 1;
            }
            '<' | '>' => {
                let op = match (c, next == Some('=')) {
                    ('<', true) => CmpOp::Le,
                    ('<', false) => CmpOp::Lt,
                    (_, true) => CmpOp::Ge,
                    (_, false) => CmpOp::Gt,
                };
                tokens.push(Token::Op(op));
                i += if next == Some('=') { 2 } else { 1 };
            }
            '&' if next == Some('&') => {
                tokens.push(Token::And);
                i += 2;
            }
            '|' if next == Some('|') => {
                tokens.push(Token::Or);
                i += 2;
            }
            '"' | '\'' => {
                let (text, end) = read_string(&chars, i)?;
                tokens.push(Token::Literal(Literal::Text(text)));
                i = end;
            }
            c if c.is_ascii_digit()
                || (matches!(c, '-' | '.') && next.is_some_and(|n| n.is_ascii_digit())) =>
            {
                let start = i;
                i += 1;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let raw: String = chars[start..i].iter().collect();
                tokens.push(Token::Literal(parse_number(&raw)?));
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                tokens.push(keyword(word));
            }
            other => {
                return Err(MonitorError::invalid_query(format!(
                    "位置 {i} 处无法识别的字符: {other}"
                )));
            }
        }
    }

    Ok(tokens)
}

fn keyword(word: String) -> Token {
    match word.as_str() {
        "and" => Token::And,
        "or" => Token::Or,
        "not" => Token::Not,
        "True" | "true" => Token::Literal(Literal::Boolean(true)),
        "False" | "false" => Token::Literal(Literal::Boolean(false)),
        "None" | "null" => Token::Literal(Literal::Null),
        _ => Token::Ident(word),
    }
}

fn parse_number(raw: &str) -> MonitorResult<Literal> {
    let invalid = || MonitorError::invalid_query(format!("无效的数字: {raw}"));
    if raw.contains('.') {
        raw.parse().map(Literal::Float).map_err(|_| invalid())
    } else {
        raw.parse().map(Literal::Integer).map_err(|_| invalid())
    }
}

/// 读取从 `start` 处引号开始的字符串，返回内容和结束引号之后的位置
fn read_string(chars: &[char], start: usize) -> MonitorResult<(String, usize)> {
    let quote = chars[start];
    let mut text = String::new();
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' if i + 1 < chars.len() => {
                text.push(chars[i + 1]);
                i += 2;
            }
            c if c == quote => return Ok((text, i + 1)),
            c => {
                text.push(c);
                i += 1;
            }
        }
    }
    Err(MonitorError::invalid_query("字符串缺少结束引号"))
}

/// 括号和 `not` 的最大嵌套层数
const MAX_DEPTH: usize = 64;
/// 单个表达式中比较子句的上限，`and`/`or` 链的深度随之受限
const MAX_COMPARISONS: usize = 256;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    comparisons: usize,
}

impl Parser {
    fn descend(&mut self) -> MonitorResult<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(MonitorError::invalid_query(format!(
                "表达式嵌套超过 {MAX_DEPTH} 层"
            )));
        }
        Ok(())
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn or_expr(&mut self) -> MonitorResult<Predicate> {
        let mut lhs = self.and_expr()?;
        while self.eat(&Token::Or) {
            let rhs = self.and_expr()?;
            lhs = Predicate::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn and_expr(&mut self) -> MonitorResult<Predicate> {
        let mut lhs = self.not_expr()?;
        while self.eat(&Token::And) {
            let rhs = self.not_expr()?;
            lhs = Predicate::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn not_expr(&mut self) -> MonitorResult<Predicate> {
        if self.eat(&Token::Not) {
            self.descend()?;
            let inner = self.not_expr()?;
            self.depth -= 1;
            return Ok(Predicate::Not(Box::new(inner)));
        }
        self.primary()
    }

    fn primary(&mut self) -> MonitorResult<Predicate> {
        if self.eat(&Token::LParen) {
            self.descend()?;
            let inner = self.or_expr()?;
            if !self.eat(&Token::RParen) {
                return Err(MonitorError::invalid_query("缺少右括号"));
            }
            self.depth -= 1;
            return Ok(inner);
        }
        self.comparison()
    }

    fn comparison(&mut self) -> MonitorResult<Predicate> {
        self.comparisons += 1;
        if self.comparisons > MAX_COMPARISONS {
            return Err(MonitorError::invalid_query(format!(
                "比较子句超过 {MAX_COMPARISONS} 个"
            )));
        }
        let lhs = self.operand()?;
        let op = match self.next() {
            Some(Token::Op(op)) => op,
            other => {
                return Err(MonitorError::invalid_query(format!(
                    "期望比较运算符，实际为: {other:?}"
                )));
            }
        };
        let rhs = self.operand()?;

        let (column, op, value) = match (lhs, rhs) {
            (Operand::Column(column), Operand::Literal(value)) => (column, op, value),
            (Operand::Literal(value), Operand::Column(column)) => (column, op.flipped(), value),
            _ => {
                return Err(MonitorError::invalid_query(
                    "比较的两侧必须分别是列名和字面量",
                ));
            }
        };

        check_operands(column, op, &value)?;
        Ok(Predicate::Compare { column, op, value })
    }

    fn operand(&mut self) -> MonitorResult<Operand> {
        match self.next() {
            Some(Token::Ident(name)) => Column::from_name(&name)
                .map(Operand::Column)
                .ok_or_else(|| MonitorError::invalid_query(format!("未知的列: {name}"))),
            Some(Token::Literal(value)) => Ok(Operand::Literal(value)),
            other => Err(MonitorError::invalid_query(format!(
                "期望列名或字面量，实际为: {other:?}"
            ))),
        }
    }
}

enum Operand {
    Column(Column),
    Literal(Literal),
}

/*!
  The base word set. Primitives are a single instruction assembled from fields. Composites are
  spliced from other words and may appear in any order in the table.

  The last two columns are the declared net effect on the data and return stacks.
*/

use super::{WordKind, WordSource};

const fn primitive(name: &'static str, code: &'static str, data: i8, ret: i8)
  -> WordSource<'static>
{
  WordSource { name, code, kind: WordKind::Primitive, data, ret }
}

const fn composite(name: &'static str, code: &'static str, data: i8)
  -> WordSource<'static>
{
  WordSource { name, code, kind: WordKind::Composite, data, ret: 0 }
}

pub static BASE_WORDS: &[WordSource<'static>] = &[
  // The halt sentinel, `ubranch 0`
  primitive("halt",    "ubranch",                               0,  0),
  primitive("noop",    "T->IN alu",                             0,  0),

  // Arithmetic and logic
  primitive("+",       "T->IN IN+N ->T d-1 alu",               -1,  0),
  primitive("*",       "T->IN IN*N ->T d-1 alu",               -1,  0),
  primitive("xor",     "T->IN IN^N ->T d-1 alu",               -1,  0),
  primitive("and",     "T->IN IN&N ->T d-1 alu",               -1,  0),
  primitive("or",      "T->IN IN|N ->T d-1 alu",               -1,  0),
  primitive("invert",  "T->IN ~IN ->T alu",                     0,  0),
  primitive("=",       "T->IN IN==N ->T d-1 alu",              -1,  0),
  primitive("<",       "T->IN N<IN ->T d-1 alu",               -1,  0),
  primitive("u<",      "T->IN Nu<IN ->T d-1 alu",              -1,  0),
  primitive("rshift",  "N->IN IN>>T ->T d-1 alu",              -1,  0),
  primitive("lshift",  "N->IN IN<<T ->T d-1 alu",              -1,  0),
  primitive("1+",      "1 imm+ imm",                            0,  0),
  primitive("2+",      "2 imm+ imm",                            0,  0),

  // Stack shuffling
  primitive("swap",    "N->IN T->N,IN-> ->T alu",               0,  0),
  primitive("dup",     "T->IN ->T d+1 alu",                     1,  0),
  primitive("nip",     "T->IN T->N,IN-> ->T d-1 alu",          -1,  0),
  primitive("tuck",    "T->IN T<->N,IN-> ->T d+1 alu",          1,  0),
  primitive("drop",    "N->IN ->T d-1 alu",                    -1,  0),
  primitive("over",    "N->IN ->T d+1 alu",                     1,  0),
  primitive(">r",      "T->IN ->R d-1 r+1 alu",                -1,  1),
  primitive("r>",      "R->IN ->T d+1 r-1 alu",                 1, -1),
  primitive("r@",      "R->IN ->T d+1 alu",                     1,  0),
  primitive("rdrop",   "T->IN ->T r-1 alu",                     0, -1),

  // Memory and I/O
  primitive("@",       "[T]->IN ->T alu",                       0,  0),
  primitive("@and",    "[T]->IN IN&N ->T d-1 alu",             -1,  0),
  primitive("!",       "N->IN ->[T] d-2 alu",                  -2,  0),
  primitive("+!",      "[T]->IN IN+N ->[T] d-2 alu",           -2,  0),
  primitive("io@",     "T->IN io[IN] ->T alu",                  0,  0),
  primitive("io!",     "N->IN ->io[T] d-2 alu",                -2,  0),

  primitive("exit",    "T->IN ->T RET r-1 alu",                 0, -1),

  // Fused forms
  primitive("@@",      "[T]->IN [IN] ->T alu",                  0,  0),
  primitive("dup@",    "[T]->IN ->T d+1 alu",                   1,  0),
  primitive("dup@@",   "[T]->IN [IN] ->T d+1 alu",              1,  0),
  primitive("over@",   "N->IN [IN] ->T d+1 alu",                1,  0),
  primitive("@r",      "R->IN [IN] ->T d+1 alu",                1,  0),
  primitive("r@;",     "R->IN ->T RET d+1 r-1 alu",             1, -1),
  primitive("2dup<",   "T->IN N<IN ->T d+1 alu",                1,  0),
  primitive("overand", "T->IN IN&N ->T alu",                    0,  0),
  primitive("dup>r",   "T->IN ->R r+1 alu",                     0,  1),
  primitive("2dupxor", "T->IN IN^N ->T d+1 alu",                1,  0),
  primitive("over+",   "T->IN IN+N ->T alu",                    0,  0),
  primitive("over=",   "T->IN IN==N ->T alu",                   0,  0),
  primitive("swap>r",  "N->IN T->N,IN-> ->R d-1 r+1 alu",      -1,  1),
  primitive("swapr>",  "R->IN T<->N,IN-> ->T d+1 r-1 alu",      1, -1),

  composite("2*",      "1 imm lshift",                          0),
  composite("2/",      "1 imm rshift",                          0),
  composite("emit",    "241 imm io!",                          -1),
  composite("8emit",   "240 imm io!",                          -1),
  composite("key",     "224 imm io@",                           1),
  composite("negate",  "invert 1 imm+ imm",                     0),
  composite("-",       "invert 1 imm+ imm +",                  -1),
  composite("1-",      "invert 1 imm+ imm invert",              0),
  composite("2drop",   "drop drop",                            -2),
  composite("rot",     ">r swap r> swap",                       0),
  composite("-rot",    "rot rot",                               0),
  composite("2dup",    "over over",                             2),
  composite("2swap",   "rot >r rot r>",                         0),
  composite("2over",   ">r >r 2dup r> r> 2swap",                2),
  composite("3rd",     ">r over r> swap",                       1),
  composite("3dup",    "3rd 3rd 3rd",                           3),
  composite(">",       "swap <",                               -1),
  composite("u>",      "swap u<",                              -1),
  composite("0=",      "0 imm =",                               0),
  composite("0<",      "0 imm <",                               0),
  composite("0>",      "0 imm >",                               0),
  composite("0<>",     "0= invert",                             0),
  composite("bounds",  "over+ swap",                            0),
  composite("s>d",     "dup 0<",                                1),

  // Narrow memory access over the 64-bit `@` and `!`
  composite("c@",      "@ 255 imm and",                         0),
  composite("w@",      "@ 4095 imm 15 imm<<12 imm+ imm and",    0),
  composite("c!",      "dup@ 255 imm invert and rot 255 imm and or swap !", -2),
  composite("w!",
            "dup@ 4095 imm 15 imm<<12 imm+ imm invert and \
             rot 4095 imm 15 imm<<12 imm+ imm and or swap !",   -2),
  composite("2w@",     "dup w@ swap 2+ w@",                     1),
  composite("2w!",     "tuck 2+ w! w!",                        -3),
];
